use std::fmt;

use sha2::{Digest, Sha256};

/// Maximum number of data bits a single cell may hold.
pub const MAX_CELL_BITS: usize = 1023;
/// Maximum number of child references a single cell may hold.
pub const MAX_CELL_REFS: usize = 4;

/// An immutable node of the ledger's binary cell tree: up to 1023 data bits
/// plus up to 4 references to child cells.
///
/// Cells are only created by [`CellBuilder::build`](crate::CellBuilder::build),
/// which consumes the builder, so a finalized cell can never be mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_len: usize,
    pub(crate) references: Vec<Cell>,
}

impl Cell {
    /// Number of data bits stored in this cell.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Raw data bytes; unused trailing bits of the last byte are zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Child cells referenced by this cell.
    pub fn references(&self) -> &[Cell] {
        &self.references
    }

    /// Depth of the reference tree below this cell (0 for a leaf).
    pub fn depth(&self) -> u16 {
        self.references.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }

    /// Standard representation hash of the cell.
    ///
    /// sha256 over the descriptor bytes, the completion-tagged data, each
    /// reference's depth (16-bit big-endian) and each reference's hash.
    /// This is the digest wallet contracts expect signatures over.
    pub fn repr_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.tagged_data());
        for r in &self.references {
            hasher.update(r.depth().to_be_bytes());
        }
        for r in &self.references {
            hasher.update(r.repr_hash());
        }
        hasher.finalize().into()
    }

    /// Descriptor bytes d1 (reference count) and d2 (data length marker).
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.references.len() as u8;
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data bytes with the completion tag set when the bit length is not
    /// byte-aligned: a single 1 bit directly after the payload.
    pub(crate) fn tagged_data(&self) -> Vec<u8> {
        let mut bytes = self.data.clone();
        if self.bit_len % 8 != 0 {
            let last = bytes.len() - 1;
            bytes[last] |= 1 << (7 - self.bit_len % 8);
        }
        bytes
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({}[{}]", hex::encode(&self.data), self.bit_len)?;
        for r in &self.references {
            write!(f, " -> {r:?}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use crate::CellBuilder;

    #[test]
    fn repr_hash_is_deterministic() {
        let build = || {
            let mut b = CellBuilder::new();
            b.store_uint(0xdead_beef, 32).unwrap();
            b.build()
        };
        assert_eq!(build().repr_hash(), build().repr_hash());
    }

    #[test]
    fn repr_hash_covers_references() {
        let mut leaf = CellBuilder::new();
        leaf.store_uint(7, 8).unwrap();
        let leaf = leaf.build();

        let mut with_ref = CellBuilder::new();
        with_ref.store_uint(1, 8).unwrap();
        with_ref.store_ref(leaf).unwrap();
        let with_ref = with_ref.build();

        let mut without_ref = CellBuilder::new();
        without_ref.store_uint(1, 8).unwrap();
        let without_ref = without_ref.build();

        assert_ne!(with_ref.repr_hash(), without_ref.repr_hash());
        assert_eq!(with_ref.depth(), 1);
        assert_eq!(without_ref.depth(), 0);
    }

    #[test]
    fn completion_tag_only_for_unaligned_data() {
        let mut b = CellBuilder::new();
        b.store_uint(0b101, 3).unwrap();
        let cell = b.build();
        // 101 followed by the completion bit: 1011_0000
        assert_eq!(cell.tagged_data(), vec![0b1011_0000]);

        let mut b = CellBuilder::new();
        b.store_uint(0xff, 8).unwrap();
        let cell = b.build();
        assert_eq!(cell.tagged_data(), vec![0xff]);
    }
}
