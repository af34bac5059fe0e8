use std::io::Cursor;

use bitstream_io::{BigEndian, ByteRead, ByteReader};
use crc::{Crc, CRC_32_ISCSI};

use crate::cell::{MapTonCellError, TonCellError};

const CRC32C: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// Raw representation of Cell.
///
/// References are stored as indices in BagOfCells.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub(crate) struct RawCell {
    pub(crate) data: Vec<u8>,
    pub(crate) bit_len: usize,
    pub(crate) references: Vec<usize>,
    pub(crate) is_exotic: bool,
}

/// Raw representation of BagOfCells.
///
/// `cells` must be topologically sorted.
#[derive(PartialEq, Eq, Debug, Clone, Hash)]
pub(crate) struct RawBagOfCells {
    pub(crate) cells: Vec<RawCell>,
    pub(crate) roots: Vec<usize>,
}

const GENERIC_BOC_MAGIC: u32 = 0xb5ee9c72;

impl RawBagOfCells {
    pub(crate) fn parse(serial: &[u8]) -> Result<RawBagOfCells, TonCellError> {
        let cursor = Cursor::new(serial);

        let mut reader: ByteReader<Cursor<&[u8]>, BigEndian> =
            ByteReader::endian(cursor, BigEndian);
        // serialized_boc#b5ee9c72
        let magic = reader.read::<u32>().map_boc_deserialization_error()?;
        if magic != GENERIC_BOC_MAGIC {
            return Err(TonCellError::boc_deserialization_error(format!(
                "Unsupported cell magic number: {:#x}",
                magic
            )));
        }

        // has_idx:(## 1) has_crc32c:(## 1) has_cache_bits:(## 1) flags:(## 2) { flags = 0 }
        let header = reader.read::<u8>().map_boc_deserialization_error()?;
        let has_idx = (header >> 7) & 1 == 1;
        let has_crc32c = (header >> 6) & 1 == 1;
        // size:(## 3) { size <= 4 }
        let size = header & 0b0000_0111;

        //   off_bytes:(## 8) { off_bytes <= 8 }
        let off_bytes = reader.read::<u8>().map_boc_deserialization_error()?;
        //cells:(##(size * 8))
        let cells = read_var_size(&mut reader, size)?;
        //   roots:(##(size * 8)) { roots >= 1 }
        let roots = read_var_size(&mut reader, size)?;
        //   absent:(##(size * 8)) { roots + absent <= cells }
        let _absent = read_var_size(&mut reader, size)?;
        //   tot_cells_size:(##(off_bytes * 8))
        let _tot_cells_size = read_var_size(&mut reader, off_bytes)?;
        //   root_list:(roots * ##(size * 8))
        let mut root_list = vec![];
        for _ in 0..roots {
            root_list.push(read_var_size(&mut reader, size)?)
        }
        //   index:has_idx?(cells * ##(off_bytes * 8))
        if has_idx {
            for _ in 0..cells {
                read_var_size(&mut reader, off_bytes)?;
            }
        }
        //   cell_data:(tot_cells_size * [ uint8 ])
        let mut cell_vec = Vec::with_capacity(cells);
        for _ in 0..cells {
            let cell = read_cell(&mut reader, size)?;
            cell_vec.push(cell);
        }
        //   crc32c:has_crc32c?uint32
        if has_crc32c {
            let body_len = serial.len().checked_sub(4).ok_or_else(|| {
                TonCellError::boc_deserialization_error("Bag of cells is truncated")
            })?;
            let mut crc_bytes = [0u8; 4];
            reader
                .read_bytes(&mut crc_bytes)
                .map_boc_deserialization_error()?;
            let expected = u32::from_le_bytes(crc_bytes);
            let actual = CRC32C.checksum(&serial[..body_len]);
            if expected != actual {
                return Err(TonCellError::boc_deserialization_error(format!(
                    "crc32c mismatch: expected {:#x}, got {:#x}",
                    expected, actual
                )));
            }
        }

        Ok(RawBagOfCells {
            cells: cell_vec,
            roots: root_list,
        })
    }

    /// Serializes with a single root at index 0, no index and a trailing crc32c.
    pub(crate) fn serialize(&self) -> Result<Vec<u8>, TonCellError> {
        if self.roots.len() != 1 {
            return Err(TonCellError::boc_serialization_error(format!(
                "Single root expected, got {}",
                self.roots.len()
            )));
        }

        let size = bytes_needed(self.cells.len());
        let mut cell_data: Vec<u8> = Vec::new();
        for cell in &self.cells {
            write_cell(&mut cell_data, cell, size)?;
        }
        let off_bytes = bytes_needed(cell_data.len());

        let mut res: Vec<u8> = Vec::with_capacity(cell_data.len() + 32);
        res.extend_from_slice(&GENERIC_BOC_MAGIC.to_be_bytes());
        res.push(0b0100_0000 | size);
        res.push(off_bytes);
        write_var_size(&mut res, self.cells.len(), size);
        write_var_size(&mut res, 1, size);
        write_var_size(&mut res, 0, size);
        write_var_size(&mut res, cell_data.len(), off_bytes);
        write_var_size(&mut res, self.roots[0], size);
        res.extend_from_slice(&cell_data);

        let crc = CRC32C.checksum(&res);
        res.extend_from_slice(&crc.to_le_bytes());
        Ok(res)
    }
}

fn read_cell(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    size: u8,
) -> Result<RawCell, TonCellError> {
    let d1 = reader.read::<u8>().map_boc_deserialization_error()?;
    let d2 = reader.read::<u8>().map_boc_deserialization_error()?;

    let ref_num = d1 & 0b111;
    let is_exotic = (d1 & 0b1000) != 0;
    let has_hashes = (d1 & 0b10000) != 0;
    let level_mask = (d1 >> 5) as u32;
    let data_size = ((d2 >> 1) + (d2 & 1)).into();
    let full_bytes = (d2 & 0x01) == 0;

    if has_hashes {
        let hash_count = level_mask.count_ones() + 1;
        let skip_size = hash_count * (32 + 2);
        reader.skip(skip_size).map_boc_deserialization_error()?;
    }

    let mut data = reader
        .read_to_vec(data_size)
        .map_boc_deserialization_error()?;

    let data_len = data.len();
    let padding_len = if data_len > 0 && !full_bytes {
        let num_zeros = data[data_len - 1].trailing_zeros();
        if num_zeros >= 8 {
            return Err(TonCellError::boc_deserialization_error(
                "Last byte of binary must not be zero if full_byte flag is not set",
            ));
        }
        data[data_len - 1] &= !(1 << num_zeros);
        num_zeros + 1
    } else {
        0
    };
    let bit_len = data.len() * 8 - padding_len as usize;
    let mut references: Vec<usize> = Vec::new();
    for _ in 0..ref_num {
        references.push(read_var_size(reader, size)?);
    }
    Ok(RawCell {
        data,
        bit_len,
        references,
        is_exotic,
    })
}

fn write_cell(out: &mut Vec<u8>, cell: &RawCell, size: u8) -> Result<(), TonCellError> {
    if cell.references.len() > 4 {
        return Err(TonCellError::boc_serialization_error(format!(
            "Cell has {} references",
            cell.references.len()
        )));
    }
    let d1 = cell.references.len() as u8 | if cell.is_exotic { 8 } else { 0 };
    let d2 = ((cell.bit_len / 8) + ((cell.bit_len + 7) / 8)) as u8;
    out.push(d1);
    out.push(d2);

    let byte_len = (cell.bit_len + 7) / 8;
    let mut data = cell.data[..byte_len].to_vec();
    let rest = cell.bit_len % 8;
    if rest != 0 {
        data[byte_len - 1] &= 0xffu8 << (8 - rest);
        data[byte_len - 1] |= 1 << (7 - rest);
    }
    out.extend_from_slice(&data);

    for reference in &cell.references {
        write_var_size(out, *reference, size);
    }
    Ok(())
}

fn read_var_size(
    reader: &mut ByteReader<Cursor<&[u8]>, BigEndian>,
    n: u8,
) -> Result<usize, TonCellError> {
    let bytes = reader
        .read_to_vec(n.into())
        .map_boc_deserialization_error()?;

    let mut result = 0;
    for &byte in &bytes {
        result <<= 8;
        result |= usize::from(byte);
    }
    Ok(result)
}

fn write_var_size(out: &mut Vec<u8>, value: usize, n: u8) {
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[bytes.len() - n as usize..]);
}

fn bytes_needed(value: usize) -> u8 {
    let mut n = 1u8;
    while n < 8 && value >> (8 * n as usize) != 0 {
        n += 1;
    }
    n
}
