use crate::{Cell, Coins, EncodeError, TonAddress, MAX_CELL_BITS, MAX_CELL_REFS};

/// Append-only bit/byte writer producing a single [`Cell`].
///
/// The builder owns its buffer exclusively and is consumed by [`build`],
/// so reuse after finalization is rejected at compile time rather than at
/// run time. All `store_*` methods return `&mut Self` for chaining with `?`.
///
/// Exceeding the 1023-bit or 4-reference capacity is a hard
/// [`EncodeError`], never a truncation.
///
/// [`build`]: Self::build
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Cell>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data bits still available in this cell.
    pub fn remaining_bits(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// Reference slots still available in this cell.
    pub fn remaining_refs(&self) -> usize {
        MAX_CELL_REFS - self.references.len()
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), EncodeError> {
        if requested > self.remaining_bits() {
            return Err(EncodeError::CellOverflow { requested, remaining: self.remaining_bits() });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 1 << (7 - self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Appends a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, EncodeError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Appends `bits` bits of `value`, most significant bit first.
    pub fn store_uint(&mut self, value: u64, bits: u16) -> Result<&mut Self, EncodeError> {
        self.store_u128(value as u128, bits)
    }

    /// Appends `bits` bits of a 128-bit `value`, most significant bit first.
    /// Widths beyond 128 bits are zero-padded on the left.
    pub fn store_u128(&mut self, value: u128, bits: u16) -> Result<&mut Self, EncodeError> {
        if bits < 128 && value >> bits != 0 {
            return Err(EncodeError::ValueOutOfRange { value, bits });
        }
        self.ensure_bits(bits as usize)?;
        for _ in 128..bits {
            self.push_bit(false);
        }
        for i in (0..bits.min(128)).rev() {
            self.push_bit(value >> i & 1 == 1);
        }
        Ok(self)
    }

    /// Appends a size-prefixed variable-length unsigned integer.
    ///
    /// The prefix is `bits_for(size_limit_bytes - 1)` bits wide and holds the
    /// number of magnitude bytes that follow, big-endian. Zero encodes as a
    /// zero length with no payload bytes.
    pub fn store_var_uint(
        &mut self,
        value: u128,
        size_limit_bytes: u8,
    ) -> Result<&mut Self, EncodeError> {
        let needed = (128 - value.leading_zeros()) as u32;
        let available = (size_limit_bytes as u32).saturating_sub(1) * 8;
        if size_limit_bytes == 0 || needed > available {
            return Err(EncodeError::VarUintOutOfBounds { needed, available });
        }
        let byte_len = needed.div_ceil(8);
        self.store_uint(byte_len as u64, bits_for(size_limit_bytes as u32 - 1))?;
        for i in (0..byte_len).rev() {
            self.store_uint((value >> (8 * i) & 0xff) as u64, 8)?;
        }
        Ok(self)
    }

    /// Appends a coin amount as a 16-byte-limited varuint.
    pub fn store_coins(&mut self, coins: Coins) -> Result<&mut Self, EncodeError> {
        self.store_var_uint(coins.nano(), 16)
    }

    /// Appends a standard internal address: `addr_std` tag, no anycast,
    /// 8-bit workchain, 256-bit account hash.
    pub fn store_address(&mut self, address: &TonAddress) -> Result<&mut Self, EncodeError> {
        self.store_uint(0b100, 3)?;
        self.store_uint(address.workchain as u8 as u64, 8)?;
        self.store_slice(&address.hash)
    }

    /// Appends an optional address; `None` is written as `addr_none`.
    pub fn store_opt_address(
        &mut self,
        address: Option<&TonAddress>,
    ) -> Result<&mut Self, EncodeError> {
        match address {
            Some(address) => self.store_address(address),
            None => self.store_uint(0b00, 2),
        }
    }

    /// Appends whole bytes.
    pub fn store_slice(&mut self, bytes: &[u8]) -> Result<&mut Self, EncodeError> {
        self.ensure_bits(bytes.len() * 8)?;
        for &b in bytes {
            self.store_uint(b as u64, 8)?;
        }
        Ok(self)
    }

    /// Attaches a child cell reference.
    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, EncodeError> {
        if self.references.len() == MAX_CELL_REFS {
            return Err(EncodeError::RefOverflow);
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Attaches an optional child cell behind a presence bit.
    pub fn store_maybe_ref(&mut self, cell: Option<Cell>) -> Result<&mut Self, EncodeError> {
        match cell {
            Some(cell) => {
                self.store_bit(true)?;
                self.store_ref(cell)
            }
            None => self.store_bit(false),
        }
    }

    /// Appends the data and references of an already-built cell inline.
    pub fn store_cell(&mut self, cell: &Cell) -> Result<&mut Self, EncodeError> {
        self.ensure_bits(cell.bit_len())?;
        for i in 0..cell.bit_len() {
            self.push_bit(cell.data()[i / 8] >> (7 - i % 8) & 1 == 1);
        }
        for r in cell.references() {
            self.store_ref(r.clone())?;
        }
        Ok(self)
    }

    /// Appends arbitrarily long data in the ledger's "snake" convention:
    /// as many whole bytes as fit in the current cell, the remainder chained
    /// into a single referenced child, recursively.
    pub fn store_snake_data(&mut self, data: &[u8]) -> Result<&mut Self, EncodeError> {
        let fit = (self.remaining_bits() / 8).min(data.len());
        self.store_slice(&data[..fit])?;
        let rest = &data[fit..];
        if !rest.is_empty() {
            let mut child = Self::new();
            child.store_snake_data(rest)?;
            self.store_ref(child.build())?;
        }
        Ok(self)
    }

    /// Appends a UTF-8 string in the snake convention.
    pub fn store_snake_str(&mut self, s: &str) -> Result<&mut Self, EncodeError> {
        self.store_snake_data(s.as_bytes())
    }

    /// Finalizes the builder into an immutable cell, consuming it.
    pub fn build(self) -> Cell {
        Cell { data: self.data, bit_len: self.bit_len, references: self.references }
    }
}

/// Number of bits needed to represent `value` (0 for 0).
pub(crate) fn bits_for(value: u32) -> u16 {
    (32 - value.leading_zeros()) as u16
}
