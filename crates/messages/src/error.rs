use thiserror::Error;
use tonforge_boc::EncodeError;

/// Errors raised while assembling an unsigned message.
///
/// Cell-level encoding failures propagate unchanged: an amount too large
/// for a pool's gas varuint limit surfaces as the underlying
/// [`EncodeError::VarUintOutOfBounds`], never as a silent clamp.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("expiration timestamp {0} does not fit the 32-bit valid_until field")]
    TimeoutOutOfRange(u64),
}
