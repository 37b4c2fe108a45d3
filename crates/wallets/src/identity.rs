use tonforge_boc::TonAddress;
use tonforge_messages::ContractVersion;

/// A wallet the pipeline can act for: its on-chain address plus the kind
/// that decides how (and whether) it signs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    pub address: TonAddress,
    pub kind: WalletKind,
}

/// The closed set of wallet kinds.
///
/// Signing dispatch matches over this enum without a default arm, so
/// adding a kind forces every signing call site to be revisited. Lockup
/// and watch-only wallets fail closed: they never produce an unsigned or
/// garbage payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletKind {
    /// Mnemonic-backed wallet; signing is local and synchronous.
    Regular { public_key: [u8; 32], version: ContractVersion },
    /// Legacy lockup contract with frozen funds; signing unsupported.
    Lockup { public_key: [u8; 32], config: LockupConfig },
    /// Address-only wallet; no private key exists on this device.
    WatchOnly,
    /// Key lives in an out-of-process signer reached over a deep link.
    External { public_key: [u8; 32], version: ContractVersion },
}

/// Deployment parameters of a legacy lockup contract. Kept for display and
/// address recovery; signing them is deliberately unsupported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockupConfig {
    pub config_public_key: Option<[u8; 32]>,
    pub allowed_destinations: Vec<TonAddress>,
}

impl Wallet {
    /// The public key for kinds that have one.
    pub fn public_key(&self) -> Option<&[u8; 32]> {
        match &self.kind {
            WalletKind::Regular { public_key, .. }
            | WalletKind::Lockup { public_key, .. }
            | WalletKind::External { public_key, .. } => Some(public_key),
            WalletKind::WatchOnly => None,
        }
    }

    /// The contract version for kinds that can produce signing payloads.
    pub fn version(&self) -> Option<ContractVersion> {
        match &self.kind {
            WalletKind::Regular { version, .. } | WalletKind::External { version, .. } => {
                Some(*version)
            }
            WalletKind::Lockup { .. } | WalletKind::WatchOnly => None,
        }
    }
}
