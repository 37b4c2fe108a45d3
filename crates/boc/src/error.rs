use thiserror::Error;

/// Errors raised while constructing or reading cells.
///
/// Encoding errors are programming or input errors: they are fatal to the
/// current message-building attempt and are never retried. Every variant
/// carries enough context to diagnose which store call failed and why.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u128, bits: u16 },

    #[error("varuint value needs {needed} bits but the size limit allows {available}")]
    VarUintOutOfBounds { needed: u32, available: u32 },

    #[error("cell data overflow: {requested} bits requested, {remaining} of 1023 remaining")]
    CellOverflow { requested: usize, remaining: usize },

    #[error("cell reference overflow: a cell holds at most 4 references")]
    RefOverflow,

    #[error("slice underflow: {requested} bits requested, {remaining} remaining")]
    SliceUnderflow { requested: usize, remaining: usize },

    #[error("slice reference underflow: no more references to load")]
    RefUnderflow,

    #[error("unexpected address tag bits {0:#05b}")]
    UnexpectedAddressTag(u8),
}

/// Errors raised while parsing an address from either textual encoding.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AddressParseError {
    #[error("address is neither raw (`wc:hex`) nor a 48-character friendly form: {0:?}")]
    UnknownFormat(String),

    #[error("invalid workchain {0:?}")]
    InvalidWorkchain(String),

    #[error("invalid account hash hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("friendly address payload is {0} bytes, expected 36")]
    InvalidLength(usize),

    #[error("friendly address checksum mismatch")]
    ChecksumMismatch,

    #[error("unknown friendly address tag {0:#04x}")]
    UnknownTag(u8),
}
