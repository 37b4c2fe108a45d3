use tonforge_boc::{Cell, CellBuilder, Coins, TonAddress};

use crate::BuildError;

/// Opcode of the standard NFT ownership transfer.
pub const NFT_TRANSFER_OP: u32 = 0x5fcc_3d14;

/// Value attached to an NFT-transfer message; the item contract refunds the
/// unused remainder to the response destination.
pub const NFT_TRANSFER_ATTACHED: Coins = Coins::from_nano(1_000_000_000);

/// Parameters of an NFT ownership transfer, addressed to the item contract.
#[derive(Clone, Debug)]
pub struct NftTransfer<'a> {
    pub query_id: u64,
    pub new_owner: &'a TonAddress,
    pub response_destination: &'a TonAddress,
    pub forward_amount: Coins,
    pub comment: Option<&'a str>,
}

/// Builds the NFT-transfer body. A comment travels in the forward payload
/// after a 32-bit zero marker, attached as a reference.
pub fn nft_transfer_body(transfer: &NftTransfer<'_>) -> Result<Cell, BuildError> {
    let mut b = CellBuilder::new();
    b.store_uint(NFT_TRANSFER_OP as u64, 32)?;
    b.store_uint(transfer.query_id, 64)?;
    b.store_address(transfer.new_owner)?;
    b.store_address(transfer.response_destination)?;
    b.store_maybe_ref(None)?; // no custom payload
    b.store_coins(transfer.forward_amount)?;
    match transfer.comment {
        Some(comment) => {
            let mut fwd = CellBuilder::new();
            fwd.store_uint(0, 32)?;
            fwd.store_snake_str(comment)?;
            b.store_bit(true)?;
            b.store_ref(fwd.build())?;
        }
        None => {
            b.store_bit(false)?;
        }
    }
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonforge_boc::CellSlice;

    #[test]
    fn layout_round_trips() {
        let new_owner = TonAddress::new(0, [0xaa; 32]);
        let response = TonAddress::new(0, [0xbb; 32]);
        let cell = nft_transfer_body(&NftTransfer {
            query_id: 9,
            new_owner: &new_owner,
            response_destination: &response,
            forward_amount: Coins::from_nano(1),
            comment: Some("enjoy"),
        })
        .unwrap();

        let mut s = CellSlice::new(&cell);
        assert_eq!(s.load_uint(32).unwrap(), NFT_TRANSFER_OP as u64);
        assert_eq!(s.load_uint(64).unwrap(), 9);
        assert_eq!(s.load_address().unwrap(), new_owner);
        assert_eq!(s.load_address().unwrap(), response);
        assert!(!s.load_bit().unwrap());
        assert_eq!(s.load_coins().unwrap(), Coins::from_nano(1));
        assert!(s.load_bit().unwrap());
        let mut fwd = CellSlice::new(s.load_ref().unwrap());
        assert_eq!(fwd.load_uint(32).unwrap(), 0); // comment marker
        assert_eq!(fwd.load_snake_data().unwrap(), b"enjoy");
    }
}
