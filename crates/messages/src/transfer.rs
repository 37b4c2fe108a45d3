use tonforge_boc::{Cell, CellBuilder};

use crate::BuildError;

/// Builds the payload of a plain transfer: a zero opcode followed by the
/// comment in the snake convention. A transfer without a comment carries no
/// payload at all.
pub fn transfer_payload(comment: Option<&str>) -> Result<Option<Cell>, BuildError> {
    match comment {
        Some(comment) => Ok(Some(comment_body(comment)?)),
        None => Ok(None),
    }
}

/// A text comment payload: 32-bit zero opcode plus the snake string.
pub fn comment_body(comment: &str) -> Result<Cell, BuildError> {
    let mut b = CellBuilder::new();
    b.store_uint(0, 32)?;
    b.store_snake_str(comment)?;
    Ok(b.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonforge_boc::CellSlice;

    #[test]
    fn no_comment_means_no_payload() {
        assert!(transfer_payload(None).unwrap().is_none());
    }

    #[test]
    fn comment_round_trips() {
        let cell = transfer_payload(Some("for coffee")).unwrap().unwrap();
        let mut s = CellSlice::new(&cell);
        assert_eq!(s.load_uint(32).unwrap(), 0);
        assert_eq!(s.load_snake_data().unwrap(), b"for coffee");
    }

    #[test]
    fn long_comment_spills_into_chained_cells() {
        let long = "a".repeat(300);
        let cell = comment_body(&long).unwrap();
        assert_eq!(cell.references().len(), 1);
        let mut s = CellSlice::new(&cell);
        s.load_uint(32).unwrap();
        assert_eq!(s.load_snake_data().unwrap(), long.as_bytes());
    }
}
