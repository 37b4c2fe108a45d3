//! Unsigned ledger message builders.
//!
//! Every builder here is a pure function from typed operation parameters to
//! cells: no I/O, no clocks, no signing. Query ids are always supplied by
//! the caller so a builder's output is fully determined by its inputs.

mod dns;
mod error;
mod jetton;
mod message;
mod nft;
mod staking;
mod transfer;
mod wallet;

pub use dns::*;
pub use error::*;
pub use jetton::*;
pub use message::*;
pub use nft::*;
pub use staking::*;
pub use transfer::*;
pub use wallet::*;
