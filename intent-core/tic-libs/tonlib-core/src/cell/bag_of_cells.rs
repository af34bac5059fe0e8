use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cell::raw::{RawBagOfCells, RawCell};
use crate::cell::*;
use crate::TonHash;

#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub struct BagOfCells {
    pub roots: Vec<ArcCell>,
}

impl BagOfCells {
    pub fn new(roots: &[ArcCell]) -> BagOfCells {
        BagOfCells {
            roots: roots.to_vec(),
        }
    }

    pub fn from_root(root: Cell) -> BagOfCells {
        BagOfCells {
            roots: vec![root.to_arc()],
        }
    }

    pub fn single_root(&self) -> Result<&ArcCell, TonCellError> {
        let root_count = self.roots.len();
        if root_count == 1 {
            Ok(&self.roots[0])
        } else {
            Err(TonCellError::CellParserError(format!(
                "Single root expected, got {}",
                root_count
            )))
        }
    }

    pub fn parse(serial: &[u8]) -> Result<BagOfCells, TonCellError> {
        let raw = RawBagOfCells::parse(serial)?;
        let num_cells = raw.cells.len();
        let mut cells: Vec<ArcCell> = Vec::with_capacity(num_cells);

        for (cell_index, raw_cell) in raw.cells.into_iter().enumerate().rev() {
            let mut references = Vec::with_capacity(raw_cell.references.len());
            for ref_index in &raw_cell.references {
                if *ref_index <= cell_index || *ref_index >= num_cells {
                    return Err(TonCellError::boc_deserialization_error(
                        "References to previous cells are not supported",
                    ));
                }
                references.push(cells[num_cells - 1 - ref_index].clone());
            }

            let cell = Cell::new(
                raw_cell.data,
                raw_cell.bit_len,
                references,
                raw_cell.is_exotic,
            )
            .map_boc_deserialization_error()?;
            cells.push(cell.to_arc());
        }

        let mut roots = Vec::with_capacity(raw.roots.len());
        for r in raw.roots {
            let cell = cells.get(num_cells.wrapping_sub(1 + r)).ok_or_else(|| {
                TonCellError::boc_deserialization_error(format!("Root index {} out of range", r))
            })?;
            roots.push(Arc::clone(cell));
        }

        Ok(BagOfCells { roots })
    }

    pub fn parse_base64(base64: &str) -> Result<BagOfCells, TonCellError> {
        let bin = base64::decode(base64).map_boc_deserialization_error()?;
        Self::parse(&bin)
    }

    /// Serializes the single root with its distinct descendants, parents
    /// always ahead of their children.
    pub fn serialize(&self) -> Result<Vec<u8>, TonCellError> {
        let root = self.single_root()?;

        let mut post_order: Vec<ArcCell> = Vec::new();
        let mut visited: HashSet<TonHash> = HashSet::new();
        collect_post_order(root, &mut visited, &mut post_order);
        post_order.reverse();

        let index: HashMap<TonHash, usize> = post_order
            .iter()
            .enumerate()
            .map(|(i, cell)| (cell.cell_hash(), i))
            .collect();

        let mut raw_cells = Vec::with_capacity(post_order.len());
        for cell in &post_order {
            let mut references = Vec::with_capacity(cell.references().len());
            for reference in cell.references() {
                let ref_index = index.get(&reference.cell_hash()).ok_or_else(|| {
                    TonCellError::boc_serialization_error("Reference missing from cell index")
                })?;
                references.push(*ref_index);
            }
            raw_cells.push(RawCell {
                data: cell.data().to_vec(),
                bit_len: cell.bit_len(),
                references,
                is_exotic: cell.is_exotic(),
            });
        }

        RawBagOfCells {
            cells: raw_cells,
            roots: vec![0],
        }
        .serialize()
    }

    pub fn to_base64(&self) -> Result<String, TonCellError> {
        Ok(base64::encode(self.serialize()?))
    }
}

fn collect_post_order(
    cell: &ArcCell,
    visited: &mut HashSet<TonHash>,
    out: &mut Vec<ArcCell>,
) {
    if !visited.insert(cell.cell_hash()) {
        return;
    }
    for reference in cell.references() {
        collect_post_order(reference, visited, out);
    }
    out.push(cell.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_and_parse_shared_reference() {
        let leaf = CellBuilder::new()
            .store_u32(32, 0xdeadbeef)
            .unwrap()
            .build()
            .unwrap()
            .to_arc();
        let branch = CellBuilder::new()
            .store_bit(true)
            .unwrap()
            .store_reference(&leaf)
            .unwrap()
            .build()
            .unwrap()
            .to_arc();
        let root = CellBuilder::new()
            .store_u8(5, 0b10101)
            .unwrap()
            .store_reference(&branch)
            .unwrap()
            .store_reference(&leaf)
            .unwrap()
            .build()
            .unwrap();
        let root_hash = root.cell_hash();

        let serial = BagOfCells::from_root(root).serialize().unwrap();
        // three distinct cells, the leaf is stored once
        assert_eq!(serial[6], 3);

        let parsed = BagOfCells::parse(&serial).unwrap();
        let parsed_root = parsed.single_root().unwrap();
        assert_eq!(parsed_root.cell_hash(), root_hash);
        assert_eq!(parsed_root.bit_len(), 5);
    }

    #[test]
    fn test_base64_round_trip_keeps_hash() {
        let root = CellBuilder::new()
            .store_string("hello")
            .unwrap()
            .build()
            .unwrap();
        let hash = root.cell_hash();
        let encoded = BagOfCells::from_root(root).to_base64().unwrap();
        let decoded = BagOfCells::parse_base64(&encoded).unwrap();
        assert_eq!(decoded.single_root().unwrap().cell_hash(), hash);
    }

    #[test]
    fn test_parse_rejects_bad_magic() {
        assert!(BagOfCells::parse(&[0u8; 16]).is_err());
    }
}
