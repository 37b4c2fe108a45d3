//! Bag-of-cells serialization: the wire framing a node ingests.
//!
//! Only the generic single-root form without index or checksum is emitted;
//! that is all an external message broadcast needs.

use std::collections::{HashMap, HashSet};

use base64::{engine::general_purpose, Engine as _};

use crate::Cell;

const BOC_MAGIC: u32 = 0xb5ee_9c72;

/// Serializes a cell tree rooted at `root` into bag-of-cells bytes.
pub fn encode(root: &Cell) -> Vec<u8> {
    let cells = topo_order(root);
    let mut index = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        index.insert(cell.repr_hash(), i);
    }

    let s = ref_size(cells.len() as u64);
    let mut payload = Vec::new();
    for cell in &cells {
        payload.extend_from_slice(&cell.descriptors());
        payload.extend_from_slice(&cell.tagged_data());
        for r in cell.references() {
            write_be(&mut payload, index[&r.repr_hash()] as u64, s);
        }
    }

    let offset_bytes = ref_size(payload.len() as u64);

    let mut out = Vec::with_capacity(payload.len() + 16);
    out.extend_from_slice(&BOC_MAGIC.to_be_bytes());
    out.push(s);
    out.push(offset_bytes);
    write_be(&mut out, cells.len() as u64, s);
    write_be(&mut out, 1, s); // roots
    write_be(&mut out, 0, s); // absent
    write_be(&mut out, payload.len() as u64, offset_bytes);
    write_be(&mut out, 0, s); // root index
    out.extend_from_slice(&payload);
    out
}

/// Serializes a cell tree and encodes it in standard base64 for transport.
pub fn encode_base64(root: &Cell) -> String {
    general_purpose::STANDARD.encode(encode(root))
}

/// Reverse post-order DFS with deduplication by representation hash, so
/// every reference index points forward.
fn topo_order(root: &Cell) -> Vec<&Cell> {
    fn visit<'a>(cell: &'a Cell, seen: &mut HashSet<[u8; 32]>, post: &mut Vec<&'a Cell>) {
        if !seen.insert(cell.repr_hash()) {
            return;
        }
        for r in cell.references() {
            visit(r, seen, post);
        }
        post.push(cell);
    }

    let mut post = Vec::new();
    visit(root, &mut HashSet::new(), &mut post);
    post.reverse();
    post
}

/// Smallest byte width able to hold `n`.
fn ref_size(n: u64) -> u8 {
    let mut bytes = 1u8;
    while bytes < 8 && n >= 1u64 << (8 * bytes) {
        bytes += 1;
    }
    bytes
}

fn write_be(out: &mut Vec<u8>, value: u64, bytes: u8) {
    for i in (0..bytes).rev() {
        out.push((value >> (8 * i)) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellBuilder;

    #[test]
    fn empty_cell_matches_known_framing() {
        // The canonical serialization of a single empty cell.
        let cell = CellBuilder::new().build();
        assert_eq!(hex::encode(encode(&cell)), "b5ee9c72010101010002000000");
        assert_eq!(encode_base64(&cell), "te6ccgEBAQEAAgAAAA==");
    }

    #[test]
    fn references_are_forward_indices() {
        let mut shared = CellBuilder::new();
        shared.store_uint(0xcc, 8).unwrap();
        let shared = shared.build();

        let mut left = CellBuilder::new();
        left.store_uint(1, 8).unwrap();
        left.store_ref(shared.clone()).unwrap();
        let left = left.build();

        let mut right = CellBuilder::new();
        right.store_uint(2, 8).unwrap();
        right.store_ref(shared.clone()).unwrap();
        let right = right.build();

        let mut root = CellBuilder::new();
        root.store_ref(left).unwrap();
        root.store_ref(right).unwrap();
        let root = root.build();

        // The shared leaf is serialized once: 4 distinct cells.
        let bytes = encode(&root);
        // cells count lives right after magic, flags and offset size.
        assert_eq!(bytes[6], 4);

        // Root is first; every ref index is strictly greater than its parent's.
        let order = topo_order(&root);
        let mut index = std::collections::HashMap::new();
        for (i, c) in order.iter().enumerate() {
            index.insert(c.repr_hash(), i);
        }
        for (i, c) in order.iter().enumerate() {
            for r in c.references() {
                assert!(index[&r.repr_hash()] > i);
            }
        }
    }
}
