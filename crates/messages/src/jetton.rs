use tonforge_boc::{Cell, CellBuilder, Coins, TonAddress};

use crate::{comment_body, BuildError};

/// Opcode of the standard fungible-token transfer.
pub const JETTON_TRANSFER_OP: u32 = 0x0f8a_7ea5;

/// Value attached to a token-transfer message to cover the token wallet's
/// gas; the unused remainder is refunded to the response destination.
pub const JETTON_TRANSFER_ATTACHED: Coins = Coins::from_nano(100_000_000);

/// Forward amount carried to the recipient's token wallet so it notifies
/// its owner.
pub const JETTON_FORWARD_AMOUNT: Coins = Coins::from_nano(1);

/// Parameters of a fungible-token transfer, addressed to the sender's own
/// token wallet contract.
#[derive(Clone, Debug)]
pub struct JettonTransfer<'a> {
    pub query_id: u64,
    /// Amount in the token's base units.
    pub amount: Coins,
    /// Final recipient of the tokens.
    pub destination: &'a TonAddress,
    /// Where excess coins and the notification response go.
    pub response_destination: &'a TonAddress,
    pub forward_amount: Coins,
    pub comment: Option<&'a str>,
}

/// Builds the token-transfer body for the sender's token wallet.
pub fn jetton_transfer_body(transfer: &JettonTransfer<'_>) -> Result<Cell, BuildError> {
    let mut b = CellBuilder::new();
    b.store_uint(JETTON_TRANSFER_OP as u64, 32)?;
    b.store_uint(transfer.query_id, 64)?;
    b.store_coins(transfer.amount)?;
    b.store_address(transfer.destination)?;
    b.store_address(transfer.response_destination)?;
    b.store_maybe_ref(None)?; // no custom payload
    b.store_coins(transfer.forward_amount)?;
    match transfer.comment {
        Some(comment) => {
            b.store_bit(true)?;
            b.store_ref(comment_body(comment)?)?;
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
        let destination = TonAddress::new(0, [0x11; 32]);
        let response = TonAddress::new(0, [0x22; 32]);
        let cell = jetton_transfer_body(&JettonTransfer {
            query_id: 77,
            amount: Coins::from_nano(123_456),
            destination: &destination,
            response_destination: &response,
            forward_amount: JETTON_FORWARD_AMOUNT,
            comment: Some("tip"),
        })
        .unwrap();

        let mut s = CellSlice::new(&cell);
        assert_eq!(s.load_uint(32).unwrap(), JETTON_TRANSFER_OP as u64);
        assert_eq!(s.load_uint(64).unwrap(), 77);
        assert_eq!(s.load_coins().unwrap(), Coins::from_nano(123_456));
        assert_eq!(s.load_address().unwrap(), destination);
        assert_eq!(s.load_address().unwrap(), response);
        assert!(!s.load_bit().unwrap()); // custom payload absent
        assert_eq!(s.load_coins().unwrap(), JETTON_FORWARD_AMOUNT);
        assert!(s.load_bit().unwrap()); // forward payload as ref
        let mut fwd = CellSlice::new(s.load_ref().unwrap());
        assert_eq!(fwd.load_uint(32).unwrap(), 0);
        assert_eq!(fwd.load_snake_data().unwrap(), b"tip");
    }

    #[test]
    fn no_comment_is_an_inline_empty_forward_payload() {
        let destination = TonAddress::new(0, [0x11; 32]);
        let response = TonAddress::new(0, [0x22; 32]);
        let cell = jetton_transfer_body(&JettonTransfer {
            query_id: 0,
            amount: Coins::from_nano(1),
            destination: &destination,
            response_destination: &response,
            forward_amount: Coins::ZERO,
            comment: None,
        })
        .unwrap();
        assert!(cell.references().is_empty());
    }
}
