use thiserror::Error;
use tonforge_messages::BuildError;
use tonforge_wallets::WalletSignerError;

use crate::api::ApiError;

/// Which stage of the attempt failed; drives user-facing recovery hints
/// (a send failure must never read like a signing failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    /// Seqno/emulation/rate loading: retry from `create_request_model`.
    Load,
    /// Signature did not happen; nothing was broadcast.
    Signing,
    /// Broadcast failed after a successful signature.
    Send,
}

/// Terminal error of one confirmation attempt.
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("failed to load the transaction preview: {0}")]
    Load(#[source] ApiError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("signing failed: {0}")]
    Signing(#[source] WalletSignerError),

    #[error("broadcast failed: {0}")]
    Send(#[source] ApiError),

    #[error("no fresh draft to confirm: run create_request_model first")]
    StaleDraft,
}

impl ConfirmError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::Load(_) | Self::Build(_) | Self::StaleDraft => FailureClass::Load,
            Self::Signing(_) => FailureClass::Signing,
            Self::Send(_) => FailureClass::Send,
        }
    }
}
