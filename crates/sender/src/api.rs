//! Remote collaborator seams.
//!
//! The pipeline treats every endpoint as an opaque RPC behind one of these
//! traits; [`HttpApi`](crate::HttpApi) implements all of them, tests plug
//! in mocks.

use async_trait::async_trait;
use thiserror::Error;
use tonforge_boc::{Coins, TonAddress};

/// Transport or protocol failure talking to a remote endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned status {0}")]
    Status(u16),

    #[error("malformed endpoint response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Current state of a wallet account.
#[async_trait]
pub trait WalletStateApi: Send + Sync {
    /// The wallet's next sequence number. Never defaulted: a failure here
    /// fails the whole attempt.
    async fn seqno(&self, address: &TonAddress) -> Result<u32, ApiError>;

    /// Suggested message lifetime in seconds. Callers substitute
    /// [`DEFAULT_MESSAGE_TTL`](crate::DEFAULT_MESSAGE_TTL) when this
    /// degrades.
    async fn safe_timeout(&self) -> Result<u64, ApiError>;

    /// The wallet's spendable balance, used for the risk threshold.
    async fn balance(&self, address: &TonAddress) -> Result<Coins, ApiError>;
}

/// Projected effect of a message, from a server-side dry run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Emulation {
    /// Human-readable description of the projected ledger event.
    pub description: String,
    pub fee: Coins,
    /// Total coins the message could irrevocably move.
    pub risk_total: Coins,
    /// Number of NFTs the message could transfer away.
    pub risk_nft_count: u32,
}

#[async_trait]
pub trait EmulationApi: Send + Sync {
    /// Dry-runs a broadcast-shaped message (standard base64 bag of cells).
    async fn emulate(&self, boc: &str) -> Result<Emulation, ApiError>;
}

#[async_trait]
pub trait BroadcastApi: Send + Sync {
    /// Submits a signed message. Idempotency is the endpoint's concern.
    async fn broadcast(&self, boc: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait RatesApi: Send + Sync {
    /// Coin price in `currency`, if one is known. `None` must render as
    /// "no fiat figure", never as a 1:1 conversion.
    async fn ton_rate(&self, currency: &str) -> Result<Option<f64>, ApiError>;
}
