use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

pub use bag_of_cells::*;
pub use builder::*;
pub use error::*;
pub use parser::*;
pub use state_init::*;

use crate::TonHash;

mod bag_of_cells;
mod builder;
mod error;
mod parser;
mod raw;
mod state_init;

pub type ArcCell = Arc<Cell>;

/// Ordinary TON cell: up to 1023 data bits and 4 references.
///
/// The representation hash and depth are computed once on construction,
/// children are immutable so they never go stale.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<ArcCell>,
    is_exotic: bool,
    hash: TonHash,
    depth: u16,
}

impl Cell {
    pub fn new(
        data: Vec<u8>,
        bit_len: usize,
        references: Vec<ArcCell>,
        is_exotic: bool,
    ) -> Result<Self, TonCellError> {
        if bit_len > MAX_CELL_BITS {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} bits, got {}",
                MAX_CELL_BITS, bit_len
            )));
        }
        if references.len() > MAX_CELL_REFERENCES {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} references, got {}",
                MAX_CELL_REFERENCES,
                references.len()
            )));
        }
        if data.len() < (bit_len + 7) / 8 {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell data holds {} bytes but {} bits were declared",
                data.len(),
                bit_len
            )));
        }

        let depth = references
            .iter()
            .map(|r| r.depth + 1)
            .max()
            .unwrap_or_default();

        let mut cell = Cell {
            data,
            bit_len,
            references,
            is_exotic,
            hash: [0u8; 32],
            depth,
        };
        cell.hash = cell.compute_hash();
        Ok(cell)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn references(&self) -> &[ArcCell] {
        &self.references
    }

    pub fn is_exotic(&self) -> bool {
        self.is_exotic
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn cell_hash(&self) -> TonHash {
        self.hash
    }

    pub fn parser(&self) -> CellParser {
        CellParser::new(self.bit_len, &self.data, &self.references)
    }

    pub fn to_arc(self) -> ArcCell {
        Arc::new(self)
    }

    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let d1 = self.references.len() as u8 | if self.is_exotic { 8 } else { 0 };
        let d2 = ((self.bit_len / 8) + ((self.bit_len + 7) / 8)) as u8;
        [d1, d2]
    }

    /// Data bytes with the completion tag appended when the bit length is not
    /// a multiple of 8.
    pub(crate) fn padded_data(&self) -> Vec<u8> {
        let byte_len = (self.bit_len + 7) / 8;
        let mut data = self.data[..byte_len].to_vec();
        let rest = self.bit_len % 8;
        if rest != 0 {
            let last = byte_len - 1;
            data[last] &= 0xffu8 << (8 - rest);
            data[last] |= 1 << (7 - rest);
        }
        data
    }

    fn compute_hash(&self) -> TonHash {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        for reference in &self.references {
            hasher.update(reference.depth.to_be_bytes());
        }
        for reference in &self.references {
            hasher.update(reference.hash);
        }
        hasher.finalize().into()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell{{ bits: {}, data: {}, refs: {:?} }}",
            self.bit_len,
            hex::encode(&self.data),
            self.references
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cell_hash() {
        let cell = CellBuilder::new().build().unwrap();
        assert_eq!(
            hex::encode(cell.cell_hash()),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
        assert_eq!(cell.depth(), 0);
    }

    #[test]
    fn test_depth_follows_references() {
        let leaf = CellBuilder::new().store_u8(8, 1).unwrap().build().unwrap().to_arc();
        let mid = CellBuilder::new()
            .store_reference(&leaf)
            .unwrap()
            .build()
            .unwrap()
            .to_arc();
        let root = CellBuilder::new()
            .store_reference(&mid)
            .unwrap()
            .store_reference(&leaf)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(root.depth(), 2);
        assert_eq!(root.references().len(), 2);
    }

    #[test]
    fn test_padded_data_sets_completion_tag() {
        let cell = CellBuilder::new().store_u8(3, 0b101).unwrap().build().unwrap();
        assert_eq!(cell.bit_len(), 3);
        assert_eq!(cell.padded_data(), vec![0b1011_0000]);
        assert_eq!(cell.descriptors(), [0, 1]);
    }
}
