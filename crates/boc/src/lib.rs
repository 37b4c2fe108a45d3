//! TON cell, address and coin primitives.
//!
//! Everything a ledger message is made of: bit-exact [`Cell`] trees built
//! through the consuming [`CellBuilder`], read back through [`CellSlice`],
//! plus [`TonAddress`] text codecs, [`Coins`] amounts and the bag-of-cells
//! wire framing in [`boc`].

mod address;
pub mod boc;
mod builder;
mod cell;
mod coins;
mod error;
mod slice;

pub use address::*;
pub use builder::*;
pub use cell::*;
pub use coins::*;
pub use error::*;
pub use slice::*;
