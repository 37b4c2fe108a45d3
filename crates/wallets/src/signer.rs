use std::sync::Arc;

use ed25519_dalek::Signer as _;
use tonforge_boc::boc;
use tonforge_messages::{build_external, UnsignedMessage};
use url::Url;

use crate::{
    derive_keypair, ExternalSignerChannel, MnemonicStore, SignedPayload, Wallet, WalletKind,
    WalletSignerError,
};

/// Hook the hosting application wires to its platform URL opener; invoked
/// with the `tonsign://` deep link when an external-signer wallet signs.
pub type DeepLinkOpener = Arc<dyn Fn(&Url) + Send + Sync>;

/// Produces broadcast-ready payloads for a wallet, dispatching over its
/// kind.
///
/// The dispatch is exhaustive by construction: lockup and watch-only
/// wallets fail closed, regular wallets sign locally from the mnemonic
/// store, external wallets suspend on the [`ExternalSignerChannel`] until
/// the companion signer responds or the attempt is cancelled.
pub struct TransferSigner<S> {
    store: S,
    channel: ExternalSignerChannel,
    return_scheme: String,
    opener: Option<DeepLinkOpener>,
}

impl<S: MnemonicStore> TransferSigner<S> {
    pub fn new(store: S, channel: ExternalSignerChannel, return_scheme: impl Into<String>) -> Self {
        Self { store, channel, return_scheme: return_scheme.into(), opener: None }
    }

    /// Installs the deep-link opener; without one the hosting application
    /// must watch [`ExternalSignerChannel`] itself.
    pub fn with_opener(mut self, opener: DeepLinkOpener) -> Self {
        self.opener = Some(opener);
        self
    }

    /// The channel external-sign callbacks must be routed to.
    pub fn channel(&self) -> &ExternalSignerChannel {
        &self.channel
    }

    /// Signs an unsigned message for `wallet`, returning the bag-of-cells
    /// payload of the signed external message.
    pub async fn sign(
        &self,
        message: &UnsignedMessage,
        wallet: &Wallet,
    ) -> Result<SignedPayload, WalletSignerError> {
        match &wallet.kind {
            WalletKind::Regular { public_key, .. } => {
                let mnemonic = self.store.get_mnemonic(&wallet.address).await?;
                let keypair = derive_keypair(&mnemonic);
                if keypair.verifying_key().as_bytes() != public_key {
                    return Err(WalletSignerError::SigningFailed(
                        "stored mnemonic does not match the wallet public key".into(),
                    ));
                }
                let signature = keypair.sign(&message.body().repr_hash()).to_bytes();
                tracing::debug!(wallet = %wallet.address, seqno = message.seqno(), "signed locally");
                assemble(message, wallet, &signature)
            }
            WalletKind::Lockup { .. } => Err(WalletSignerError::lockup_unsupported()),
            WalletKind::WatchOnly => Err(WalletSignerError::watch_only_unsupported()),
            WalletKind::External { public_key, version } => {
                let body = boc::encode(message.body());
                let request =
                    self.channel.request(public_key, &body, *version, &self.return_scheme)?;
                tracing::debug!(wallet = %wallet.address, "awaiting external signer");
                if let Some(opener) = &self.opener {
                    opener(request.url());
                }
                let signature = request.wait().await?;
                assemble(message, wallet, &signature)
            }
        }
    }
}

fn assemble(
    message: &UnsignedMessage,
    wallet: &Wallet,
    signature: &[u8; 64],
) -> Result<SignedPayload, WalletSignerError> {
    let external = build_external(message, &wallet.address, signature)?;
    Ok(SignedPayload::new(boc::encode(&external)))
}
