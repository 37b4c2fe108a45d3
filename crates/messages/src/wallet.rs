use std::fmt;

use tonforge_boc::CellBuilder;

use crate::{build_internal, BuildError, TransferRequest, UnsignedMessage};

/// Base wallet id shared by the standard wallet contract family.
pub const WALLET_ID: u32 = 698_983_191;

/// Send mode used for user transfers: pay fees separately, ignore
/// action-phase errors.
pub const SEND_MODE: u8 = 3;

/// Wallet contract revisions this pipeline can produce signing payloads
/// for. The textual form is what the external-signer deep link carries in
/// its `v=` parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractVersion {
    V3R1,
    V3R2,
    V4R2,
}

impl ContractVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::V3R1 => "v3r1",
            Self::V3R2 => "v3r2",
            Self::V4R2 => "v4r2",
        }
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the wallet signing payload for one transfer.
///
/// Layout: 32-bit wallet id, 32-bit expiration, 32-bit seqno, an 8-bit
/// zero op for v4 contracts, then per-transfer an 8-bit send mode and a
/// reference to the internal message.
pub fn build_unsigned(
    version: ContractVersion,
    seqno: u32,
    valid_until: u64,
    transfer: &TransferRequest,
) -> Result<UnsignedMessage, BuildError> {
    if valid_until > u32::MAX as u64 {
        return Err(BuildError::TimeoutOutOfRange(valid_until));
    }
    let mut b = CellBuilder::new();
    b.store_uint(WALLET_ID as u64, 32)?;
    b.store_uint(valid_until, 32)?;
    b.store_uint(seqno as u64, 32)?;
    if let ContractVersion::V4R2 = version {
        b.store_uint(0, 8)?; // op: plain send
    }
    b.store_uint(SEND_MODE as u64, 8)?;
    b.store_ref(build_internal(transfer)?)?;
    Ok(UnsignedMessage::new(b.build(), transfer, seqno, valid_until))
}
