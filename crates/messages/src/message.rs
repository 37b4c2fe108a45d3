use tonforge_boc::{Cell, CellBuilder, Coins, TonAddress};

use crate::BuildError;

/// A single outgoing transfer: destination, attached value, bounce flag and
/// an optional operation payload cell.
#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub destination: TonAddress,
    pub value: Coins,
    pub bounce: bool,
    pub payload: Option<Cell>,
}

/// A fully built, not yet signed wallet message.
///
/// Immutable once built: a confirmation attempt replaces the whole value
/// rather than mutating it, so a signature can only ever cover the message
/// exactly as emulated.
#[derive(Clone, Debug)]
pub struct UnsignedMessage {
    body: Cell,
    destination: TonAddress,
    value: Coins,
    bounce: bool,
    seqno: u32,
    valid_until: u64,
}

impl UnsignedMessage {
    /// The wallet signing payload; its representation hash is what gets
    /// signed.
    pub fn body(&self) -> &Cell {
        &self.body
    }

    pub fn destination(&self) -> &TonAddress {
        &self.destination
    }

    pub fn value(&self) -> Coins {
        self.value
    }

    pub fn bounce(&self) -> bool {
        self.bounce
    }

    pub fn seqno(&self) -> u32 {
        self.seqno
    }

    pub fn valid_until(&self) -> u64 {
        self.valid_until
    }

    pub(crate) fn new(
        body: Cell,
        transfer: &TransferRequest,
        seqno: u32,
        valid_until: u64,
    ) -> Self {
        Self {
            body,
            destination: transfer.destination,
            value: transfer.value,
            bounce: transfer.bounce,
            seqno,
            valid_until,
        }
    }
}

/// Builds the `int_msg_info` envelope around an operation payload.
///
/// Fee, logical-time and creation fields are zeroed; the node fills them in
/// on acceptance. A payload, when present, is always attached as a
/// reference so the header never competes with it for cell space.
pub fn build_internal(transfer: &TransferRequest) -> Result<Cell, BuildError> {
    let mut b = CellBuilder::new();
    b.store_bit(false)?; // int_msg_info$0
    b.store_bit(true)?; // ihr_disabled
    b.store_bit(transfer.bounce)?;
    b.store_bit(false)?; // bounced
    b.store_opt_address(None)?; // src filled by the node
    b.store_address(&transfer.destination)?;
    b.store_coins(transfer.value)?;
    b.store_bit(false)?; // no extra currencies
    b.store_coins(Coins::ZERO)?; // ihr_fee
    b.store_coins(Coins::ZERO)?; // fwd_fee
    b.store_uint(0, 64)?; // created_lt
    b.store_uint(0, 32)?; // created_at
    b.store_bit(false)?; // no state init
    match &transfer.payload {
        Some(payload) => {
            b.store_bit(true)?;
            b.store_ref(payload.clone())?;
        }
        None => {
            b.store_bit(false)?;
        }
    }
    Ok(b.build())
}

/// Wraps a signed wallet body into the `ext_in_msg_info` envelope addressed
/// to the wallet contract itself, ready for bag-of-cells serialization and
/// broadcast.
pub fn build_external(
    message: &UnsignedMessage,
    wallet_address: &TonAddress,
    signature: &[u8; 64],
) -> Result<Cell, BuildError> {
    let mut signed = CellBuilder::new();
    signed.store_slice(signature)?;
    signed.store_cell(message.body())?;

    let mut b = CellBuilder::new();
    b.store_uint(0b10, 2)?; // ext_in_msg_info$10
    b.store_opt_address(None)?; // external src
    b.store_address(wallet_address)?;
    b.store_coins(Coins::ZERO)?; // import_fee
    b.store_bit(false)?; // no state init
    b.store_bit(true)?; // body as reference
    b.store_ref(signed.build())?;
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonforge_boc::CellSlice;

    fn request(payload: Option<Cell>) -> TransferRequest {
        TransferRequest {
            destination: TonAddress::new(0, [0x33; 32]),
            value: Coins::from_tons(1),
            bounce: false,
            payload,
        }
    }

    #[test]
    fn internal_message_round_trips() {
        let cell = build_internal(&request(None)).unwrap();
        let mut s = CellSlice::new(&cell);
        assert!(!s.load_bit().unwrap()); // internal
        assert!(s.load_bit().unwrap()); // ihr_disabled
        assert!(!s.load_bit().unwrap()); // bounce
        assert!(!s.load_bit().unwrap()); // bounced
        assert_eq!(s.load_opt_address().unwrap(), None);
        assert_eq!(s.load_address().unwrap(), TonAddress::new(0, [0x33; 32]));
        assert_eq!(s.load_coins().unwrap(), Coins::from_tons(1));
        assert!(!s.load_bit().unwrap());
        assert_eq!(s.load_coins().unwrap(), Coins::ZERO);
        assert_eq!(s.load_coins().unwrap(), Coins::ZERO);
        assert_eq!(s.load_uint(64).unwrap(), 0);
        assert_eq!(s.load_uint(32).unwrap(), 0);
        assert!(!s.load_bit().unwrap()); // init
        assert!(!s.load_bit().unwrap()); // inline (empty) body
        assert_eq!(s.remaining_bits(), 0);
    }

    #[test]
    fn payload_is_attached_as_reference() {
        let mut payload = CellBuilder::new();
        payload.store_uint(0, 32).unwrap();
        payload.store_snake_str("hi").unwrap();
        let cell = build_internal(&request(Some(payload.build()))).unwrap();

        assert_eq!(cell.references().len(), 1);
        let mut s = CellSlice::new(cell.references().first().unwrap());
        assert_eq!(s.load_uint(32).unwrap(), 0);
        assert_eq!(s.load_snake_data().unwrap(), b"hi");
    }
}
