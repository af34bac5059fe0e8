use bitstream_io::{BigEndian, BitWrite, BitWriter};

use crate::cell::error::{MapTonCellError, TonCellError};
use crate::cell::{ArcCell, Cell};
use crate::types::TonAddress;

pub(crate) const MAX_CELL_BITS: usize = 1023;
pub(crate) const MAX_CELL_REFERENCES: usize = 4;

/// Grams/Coins are `VarUInteger 16`: a 4 bit byte length, so at most 15 bytes.
const MAX_COINS_BYTES: usize = 15;

pub struct CellBuilder {
    bit_writer: BitWriter<Vec<u8>, BigEndian>,
    bits_to_write: usize,
    references: Vec<ArcCell>,
}

impl CellBuilder {
    pub fn new() -> CellBuilder {
        let bit_writer = BitWriter::endian(Vec::new(), BigEndian);
        CellBuilder {
            bit_writer,
            bits_to_write: 0,
            references: Vec::new(),
        }
    }

    pub fn store_bit(&mut self, val: bool) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(1)?;
        self.bit_writer.write_bit(val).map_cell_builder_error()?;
        self.bits_to_write += 1;
        Ok(self)
    }

    pub fn store_u8(&mut self, bit_len: usize, val: u8) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_u32(&mut self, bit_len: usize, val: u32) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_i32(&mut self, bit_len: usize, val: i32) -> Result<&mut Self, TonCellError> {
        self.store_u32(bit_len, val as u32)
    }

    pub fn store_u64(&mut self, bit_len: usize, val: u64) -> Result<&mut Self, TonCellError> {
        self.ensure_capacity(bit_len)?;
        self.bit_writer
            .write(bit_len as u32, val)
            .map_cell_builder_error()?;
        self.bits_to_write += bit_len;
        Ok(self)
    }

    pub fn store_byte(&mut self, val: u8) -> Result<&mut Self, TonCellError> {
        self.store_u8(8, val)
    }

    pub fn store_slice(&mut self, slice: &[u8]) -> Result<&mut Self, TonCellError> {
        for val in slice {
            self.store_byte(*val)?;
        }
        Ok(self)
    }

    pub fn store_string(&mut self, val: &str) -> Result<&mut Self, TonCellError> {
        self.store_slice(val.as_bytes())
    }

    /// Stores `Coins` (`VarUInteger 16`): byte length in 4 bits then the value
    /// big-endian with no leading zero bytes.
    pub fn store_coins(&mut self, val: u128) -> Result<&mut Self, TonCellError> {
        if val == 0 {
            return self.store_u8(4, 0);
        }
        let bytes = val.to_be_bytes();
        let leading = bytes.iter().take_while(|b| **b == 0).count();
        let significant = &bytes[leading..];
        if significant.len() > MAX_COINS_BYTES {
            return Err(TonCellError::cell_builder_error(format!(
                "Coins value {} does not fit in {} bytes",
                val, MAX_COINS_BYTES
            )));
        }
        self.store_u8(4, significant.len() as u8)?;
        self.store_slice(significant)
    }

    /// Stores `MsgAddressInt` as `addr_std$10 anycast:(Maybe Anycast) workchain_id:int8 address:bits256`.
    pub fn store_address(&mut self, address: &TonAddress) -> Result<&mut Self, TonCellError> {
        let workchain = i8::try_from(address.workchain).map_err(|_| {
            TonCellError::cell_builder_error(format!(
                "workchain {} does not fit in int8",
                address.workchain
            ))
        })?;
        self.store_u8(2, 0b10)?;
        self.store_bit(false)?;
        self.store_u8(8, workchain as u8)?;
        self.store_slice(&address.hash_part)
    }

    /// Stores `addr_none$00`.
    pub fn store_null_address(&mut self) -> Result<&mut Self, TonCellError> {
        self.store_u8(2, 0)
    }

    /// Adds reference to an existing `Cell`.
    ///
    /// The reference is passed as `ArcCell` so it might be references from other cells.
    pub fn store_reference(&mut self, cell: &ArcCell) -> Result<&mut Self, TonCellError> {
        let ref_count = self.references.len() + 1;
        if ref_count > MAX_CELL_REFERENCES {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} references, got {}",
                MAX_CELL_REFERENCES, ref_count
            )));
        }
        self.references.push(cell.clone());
        Ok(self)
    }

    /// `Maybe ^Cell`: a presence bit followed by the reference when present.
    pub fn store_maybe_reference(
        &mut self,
        cell: Option<&ArcCell>,
    ) -> Result<&mut Self, TonCellError> {
        match cell {
            Some(cell) => {
                self.store_bit(true)?;
                self.store_reference(cell)
            }
            None => self.store_bit(false),
        }
    }

    /// Appends the bits and references of `cell`.
    pub fn store_cell(&mut self, cell: &Cell) -> Result<&mut Self, TonCellError> {
        let mut parser = cell.parser();
        for _ in 0..cell.bit_len() {
            let bit = parser.load_bit()?;
            self.store_bit(bit)?;
        }
        for reference in cell.references() {
            self.store_reference(reference)?;
        }
        Ok(self)
    }

    /// `Either X ^X`: inline while the cell still fits, as a reference otherwise.
    pub fn store_either_cell(&mut self, cell: &ArcCell) -> Result<&mut Self, TonCellError> {
        let fits = self.remaining_bits() > cell.bit_len()
            && self.references.len() + cell.references().len() <= MAX_CELL_REFERENCES;
        if fits {
            self.store_bit(false)?;
            self.store_cell(cell)
        } else {
            self.store_bit(true)?;
            self.store_reference(cell)
        }
    }

    pub fn remaining_bits(&self) -> usize {
        MAX_CELL_BITS - self.bits_to_write
    }

    pub fn remaining_refs(&self) -> usize {
        MAX_CELL_REFERENCES - self.references.len()
    }

    pub fn build(&mut self) -> Result<Cell, TonCellError> {
        let mut trailing_zeros = 0;
        while !self.bit_writer.byte_aligned() {
            self.bit_writer.write_bit(false).map_cell_builder_error()?;
            trailing_zeros += 1;
        }

        if let Some(vec) = self.bit_writer.writer() {
            let bit_len = vec.len() * 8 - trailing_zeros;
            Cell::new(vec.clone(), bit_len, self.references.clone(), false)
        } else {
            Err(TonCellError::CellBuilderError(
                "Stream is not byte-aligned".to_string(),
            ))
        }
    }

    fn ensure_capacity(&self, bit_len: usize) -> Result<(), TonCellError> {
        if self.bits_to_write + bit_len > MAX_CELL_BITS {
            return Err(TonCellError::cell_builder_error(format!(
                "Cell must contain at most {} bits, got {}",
                MAX_CELL_BITS,
                self.bits_to_write + bit_len
            )));
        }
        Ok(())
    }
}

impl Default for CellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_coins() {
        let cell = CellBuilder::new().store_coins(0).unwrap().build().unwrap();
        assert_eq!(cell.bit_len(), 4);

        // 0.01 TON = 10_000_000 = 0x989680, three bytes
        let cell = CellBuilder::new()
            .store_coins(10_000_000)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cell.bit_len(), 4 + 24);
        assert_eq!(cell.data(), &[0x39, 0x89, 0x68, 0x00]);
    }

    #[test]
    fn test_store_coins_overflow() {
        assert!(CellBuilder::new().store_coins(u128::MAX).is_err());
    }

    #[test]
    fn test_store_address_workchain_range() {
        let cell = CellBuilder::new()
            .store_address(&TonAddress::new(-1, &[0xaa; 32]))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cell.bit_len(), 267);
        assert_eq!(cell.data()[0], 0b1001_1111);

        assert!(CellBuilder::new()
            .store_address(&TonAddress::new(300, &[0xaa; 32]))
            .is_err());
    }

    #[test]
    fn test_store_address() {
        let address = TonAddress::new(-1, &[0xffu8; 32]);
        let cell = CellBuilder::new()
            .store_address(&address)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(cell.bit_len(), 267);
        assert_eq!(cell.data()[0], 0b1001_1111);
    }

    #[test]
    fn test_cell_overflow() {
        let mut builder = CellBuilder::new();
        for _ in 0..127 {
            builder.store_byte(0xaa).unwrap();
        }
        builder.store_u8(7, 1).unwrap();
        assert_eq!(builder.remaining_bits(), 0);
        assert!(builder.store_bit(true).is_err());
    }

    #[test]
    fn test_reference_limit() {
        let leaf = CellBuilder::new().build().unwrap().to_arc();
        let mut builder = CellBuilder::new();
        for _ in 0..4 {
            builder.store_reference(&leaf).unwrap();
        }
        assert!(builder.store_reference(&leaf).is_err());
    }

    #[test]
    fn test_store_either_cell() {
        let body = CellBuilder::new()
            .store_u32(32, 0xdeadbeef)
            .unwrap()
            .build()
            .unwrap()
            .to_arc();

        let inline = CellBuilder::new()
            .store_either_cell(&body)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(inline.bit_len(), 33);
        assert!(inline.references().is_empty());
        assert_eq!(inline.data(), &[0x6f, 0x56, 0xdf, 0x77, 0x80]);

        let mut builder = CellBuilder::new();
        for _ in 0..124 {
            builder.store_byte(0).unwrap();
        }
        let referenced = builder.store_either_cell(&body).unwrap().build().unwrap();
        assert_eq!(referenced.bit_len(), 124 * 8 + 1);
        assert_eq!(referenced.references()[0].cell_hash(), body.cell_hash());
    }
}
