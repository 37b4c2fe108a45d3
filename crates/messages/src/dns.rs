use tonforge_boc::{Cell, CellBuilder, Coins};

use crate::BuildError;

/// Opcode of the domain-contract record change; with a zeroed key and no
/// value it renews the domain's ownership record.
pub const DNS_RENEW_OP: u32 = 0x4eb1_f0f9;

/// Value attached to a renewal message.
pub const DNS_LINK_AMOUNT: Coins = Coins::from_nano(20_000_000);

/// Builds the renewal body sent to a domain item contract.
pub fn dns_renew_body(query_id: u64) -> Result<Cell, BuildError> {
    let mut b = CellBuilder::new();
    b.store_uint(DNS_RENEW_OP as u64, 32)?;
    b.store_uint(query_id, 64)?;
    b.store_uint(0, 256)?; // zeroed record key
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renew_body_layout() {
        let cell = dns_renew_body(3).unwrap();
        assert_eq!(cell.bit_len(), 32 + 64 + 256);
        assert_eq!(
            hex::encode(cell.data()),
            "4eb1f0f900000000000000030000000000000000000000000000000000000000000000000000000000000000"
        );
    }
}
