use crate::{builder::bits_for, Cell, Coins, EncodeError, TonAddress};

/// Bit-level reader over a finalized [`Cell`], used to decode payloads and
/// to verify message layouts in tests.
#[derive(Clone, Debug)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self { cell, bit_pos: 0, ref_pos: 0 }
    }

    /// Data bits not yet consumed.
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// References not yet consumed.
    pub fn remaining_refs(&self) -> usize {
        self.cell.references().len() - self.ref_pos
    }

    fn ensure(&self, requested: usize) -> Result<(), EncodeError> {
        if requested > self.remaining_bits() {
            return Err(EncodeError::SliceUnderflow {
                requested,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Skips `bits` bits without interpreting them.
    pub fn skip(&mut self, bits: usize) -> Result<&mut Self, EncodeError> {
        self.ensure(bits)?;
        self.bit_pos += bits;
        Ok(self)
    }

    pub fn load_bit(&mut self) -> Result<bool, EncodeError> {
        self.ensure(1)?;
        let bit = self.cell.data()[self.bit_pos / 8] >> (7 - self.bit_pos % 8) & 1 == 1;
        self.bit_pos += 1;
        Ok(bit)
    }

    /// Reads `bits` bits as a big-endian unsigned integer.
    pub fn load_uint(&mut self, bits: u16) -> Result<u64, EncodeError> {
        Ok(self.load_u128(bits)? as u64)
    }

    pub fn load_u128(&mut self, bits: u16) -> Result<u128, EncodeError> {
        self.ensure(bits as usize)?;
        let mut value = 0u128;
        for _ in 0..bits {
            value = value << 1 | self.load_bit()? as u128;
        }
        Ok(value)
    }

    /// Reads a size-prefixed varuint written with the same `size_limit_bytes`.
    pub fn load_var_uint(&mut self, size_limit_bytes: u8) -> Result<u128, EncodeError> {
        let byte_len = self.load_uint(bits_for(size_limit_bytes as u32 - 1))?;
        self.load_u128(byte_len as u16 * 8)
    }

    pub fn load_coins(&mut self) -> Result<Coins, EncodeError> {
        Ok(Coins::from_nano(self.load_var_uint(16)?))
    }

    /// Reads a standard internal address; `addr_none` yields `None`.
    pub fn load_opt_address(&mut self) -> Result<Option<TonAddress>, EncodeError> {
        let tag = self.load_uint(2)? as u8;
        match tag {
            0b00 => Ok(None),
            0b10 => {
                let anycast = self.load_bit()?;
                if anycast {
                    return Err(EncodeError::UnexpectedAddressTag(tag << 1 | 1));
                }
                let workchain = self.load_uint(8)? as u8 as i8;
                let mut hash = [0u8; 32];
                for byte in &mut hash {
                    *byte = self.load_uint(8)? as u8;
                }
                Ok(Some(TonAddress { workchain, hash }))
            }
            other => Err(EncodeError::UnexpectedAddressTag(other)),
        }
    }

    /// Reads a standard internal address, rejecting `addr_none`.
    pub fn load_address(&mut self) -> Result<TonAddress, EncodeError> {
        self.load_opt_address()?.ok_or(EncodeError::UnexpectedAddressTag(0b00))
    }

    /// Reads the next child cell reference.
    pub fn load_ref(&mut self) -> Result<&'a Cell, EncodeError> {
        let cell = self.cell.references().get(self.ref_pos).ok_or(EncodeError::RefUnderflow)?;
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Reads snake-encoded data: the remaining whole bytes of this cell,
    /// then the chained reference cells.
    pub fn load_snake_data(&mut self) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::new();
        let mut bytes = self.remaining_bits() / 8;
        while bytes > 0 {
            out.push(self.load_uint(8)? as u8);
            bytes -= 1;
        }
        if self.remaining_refs() > 0 {
            let mut child = CellSlice::new(self.load_ref()?);
            out.extend(child.load_snake_data()?);
        }
        Ok(out)
    }
}
