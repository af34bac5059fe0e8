use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, Numeric};

use super::ArcCell;
use crate::cell::{MapTonCellError, TonCellError};
use crate::types::TonAddress;

pub struct CellParser<'a> {
    pub(crate) bit_len: usize,
    pub(crate) bit_reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    pub(crate) references: &'a [ArcCell],
    next_ref: usize,
}

impl<'a> CellParser<'a> {
    pub fn new(bit_len: usize, data: &'a [u8], references: &'a [ArcCell]) -> Self {
        let cursor = Cursor::new(data);
        let bit_reader = BitReader::endian(cursor, BigEndian);
        CellParser {
            bit_len,
            bit_reader,
            references,
            next_ref: 0,
        }
    }

    pub fn remaining_bits(&mut self) -> usize {
        let pos = self.bit_reader.position_in_bits().unwrap_or_default() as usize;
        self.bit_len.saturating_sub(pos)
    }

    pub fn remaining_refs(&self) -> usize {
        self.references.len() - self.next_ref
    }

    pub fn load_bit(&mut self) -> Result<bool, TonCellError> {
        self.ensure_enough_bits(1)?;
        self.bit_reader.read_bit().map_cell_parser_error()
    }

    pub fn load_u8(&mut self, bit_len: usize) -> Result<u8, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_u32(&mut self, bit_len: usize) -> Result<u32, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_i32(&mut self, bit_len: usize) -> Result<i32, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_u64(&mut self, bit_len: usize) -> Result<u64, TonCellError> {
        self.load_number(bit_len)
    }

    pub fn load_slice(&mut self, slice: &mut [u8]) -> Result<(), TonCellError> {
        self.ensure_enough_bits(slice.len() * 8)?;
        self.bit_reader.read_bytes(slice).map_cell_parser_error()
    }

    pub fn load_bytes(&mut self, num_bytes: usize) -> Result<Vec<u8>, TonCellError> {
        let mut res = vec![0_u8; num_bytes];
        self.load_slice(res.as_mut_slice())?;
        Ok(res)
    }

    pub fn load_coins(&mut self) -> Result<u128, TonCellError> {
        let num_bytes = self.load_u8(4)? as usize;
        let bytes = self.load_bytes(num_bytes)?;
        Ok(bytes
            .iter()
            .fold(0u128, |acc, byte| (acc << 8) | *byte as u128))
    }

    /// Reads `MsgAddress`; `addr_none` yields `None`.
    pub fn load_address(&mut self) -> Result<Option<TonAddress>, TonCellError> {
        let tp = self.load_u8(2)?;
        match tp {
            0b00 => Ok(None),
            0b10 => {
                let anycast = self.load_bit()?;
                if anycast {
                    return Err(TonCellError::InvalidAddress(
                        "Anycast addresses are not supported".to_owned(),
                    ));
                }
                let workchain = self.load_u8(8)? as i8 as i32;
                let mut hash_part = [0u8; 32];
                self.load_slice(&mut hash_part)?;
                Ok(Some(TonAddress::new(workchain, &hash_part)))
            }
            _ => Err(TonCellError::InvalidAddress(format!(
                "Unsupported address type {:#04b}",
                tp
            ))),
        }
    }

    pub fn load_ref(&mut self) -> Result<ArcCell, TonCellError> {
        let reference = self.references.get(self.next_ref).ok_or_else(|| {
            TonCellError::cell_parser_error(format!(
                "Cell has only {} references",
                self.references.len()
            ))
        })?;
        self.next_ref += 1;
        Ok(reference.clone())
    }

    pub fn ensure_empty(&mut self) -> Result<(), TonCellError> {
        let remaining_bits = self.remaining_bits();
        let remaining_refs = self.remaining_refs();
        if remaining_bits == 0 && remaining_refs == 0 {
            Ok(())
        } else {
            Err(TonCellError::NonEmptyReader {
                remaining_bits,
                remaining_refs,
            })
        }
    }

    pub fn skip_bits(&mut self, num_bits: usize) -> Result<(), TonCellError> {
        self.ensure_enough_bits(num_bits)?;
        self.bit_reader
            .skip(num_bits as u32)
            .map_cell_parser_error()
    }

    fn load_number<N: Numeric>(&mut self, bit_len: usize) -> Result<N, TonCellError> {
        self.ensure_enough_bits(bit_len)?;

        self.bit_reader
            .read::<N>(bit_len as u32)
            .map_cell_parser_error()
    }

    fn ensure_enough_bits(&mut self, bit_len: usize) -> Result<(), TonCellError> {
        if self.remaining_bits() < bit_len {
            return Err(TonCellError::CellParserError(
                "Not enough bits to read".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cell::CellBuilder;
    use crate::types::TonAddress;

    #[test]
    fn test_load_coins_and_address() {
        let address = TonAddress::new(0, &[7u8; 32]);
        let cell = CellBuilder::new()
            .store_coins(50_000_000)
            .unwrap()
            .store_address(&address)
            .unwrap()
            .store_null_address()
            .unwrap()
            .build()
            .unwrap();

        let mut parser = cell.parser();
        assert_eq!(parser.load_coins().unwrap(), 50_000_000);
        assert_eq!(parser.load_address().unwrap(), Some(address));
        assert_eq!(parser.load_address().unwrap(), None);
        parser.ensure_empty().unwrap();
    }

    #[test]
    fn test_load_ref() {
        let leaf = CellBuilder::new()
            .store_u32(32, 0x0f8a7ea5)
            .unwrap()
            .build()
            .unwrap()
            .to_arc();
        let root = CellBuilder::new()
            .store_bit(true)
            .unwrap()
            .store_reference(&leaf)
            .unwrap()
            .build()
            .unwrap();

        let mut parser = root.parser();
        assert!(parser.load_bit().unwrap());
        let loaded = parser.load_ref().unwrap();
        assert_eq!(loaded.parser().load_u32(32).unwrap(), 0x0f8a7ea5);
        assert!(parser.load_ref().is_err());
    }

    #[test]
    fn test_not_enough_bits() {
        let cell = CellBuilder::new().store_u8(4, 3).unwrap().build().unwrap();
        assert!(cell.parser().load_u8(8).is_err());
    }
}
