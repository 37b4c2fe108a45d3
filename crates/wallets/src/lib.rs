//! Wallet identities and transfer signing.
//!
//! [`TransferSigner`] dispatches exhaustively over the four wallet kinds:
//! local mnemonic-backed signing for regular wallets, hard failures for
//! lockup and watch-only wallets, and the asynchronous `tonsign://`
//! deep-link handshake for external-signer wallets.

mod error;
mod external;
mod identity;
mod mnemonic;
mod payload;
mod signer;

pub use error::*;
pub use external::*;
pub use identity::*;
pub use mnemonic::*;
pub use payload::*;
pub use signer::*;

pub use bip39::Mnemonic;
