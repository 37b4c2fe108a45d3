use thiserror::Error;
use tonforge_messages::BuildError;

/// Errors raised by the signing service and the external-signer channel.
///
/// Signing errors are recoverable by the user (re-import the mnemonic,
/// reconnect the external signer) but are never retried automatically.
#[derive(Debug, Error)]
pub enum WalletSignerError {
    #[error("no mnemonic stored for this wallet")]
    NoMnemonic,

    #[error("{0} wallets cannot sign transactions")]
    UnsupportedSigner(&'static str),

    #[error("external signer returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("signing was cancelled")]
    Cancelled,

    #[error("another signing request is already pending")]
    SignerBusy,

    #[error("no signing request is pending")]
    NoPendingRequest,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}

impl WalletSignerError {
    pub fn lockup_unsupported() -> Self {
        Self::UnsupportedSigner("lockup")
    }

    pub fn watch_only_unsupported() -> Self {
        Self::UnsupportedSigner("watch-only")
    }
}
