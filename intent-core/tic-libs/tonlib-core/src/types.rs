use std::fmt;
use std::str::FromStr;

use crc::{Crc, CRC_16_XMODEM};

use crate::cell::TonCellError;
use crate::TonHash;

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

const FLAG_BOUNCEABLE: u8 = 0x11;
const FLAG_NON_BOUNCEABLE: u8 = 0x51;
const FLAG_TESTNET: u8 = 0x80;

/// Flags carried by the user-friendly form of an address.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct TonAddressFlags {
    pub bounceable: bool,
    pub testnet: bool,
}

#[derive(PartialEq, Eq, Clone, Copy, Hash)]
pub struct TonAddress {
    pub workchain: i32,
    pub hash_part: TonHash,
}

impl TonAddress {
    pub const NULL: TonAddress = TonAddress {
        workchain: 0,
        hash_part: [0; 32],
    };

    pub fn new(workchain: i32, hash_part: &TonHash) -> TonAddress {
        TonAddress {
            workchain,
            hash_part: *hash_part,
        }
    }

    /// Parses either the raw `wc:hex` form or the 48 character friendly form.
    /// Raw addresses carry no flags.
    pub fn parse_with_flags(s: &str) -> Result<(TonAddress, Option<TonAddressFlags>), TonCellError> {
        if s.contains(':') {
            return Ok((Self::from_hex_str(s)?, None));
        }
        let (address, flags) = Self::from_base64(s)?;
        Ok((address, Some(flags)))
    }

    pub fn from_hex_str(s: &str) -> Result<TonAddress, TonCellError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            return Err(invalid(s, "expected <workchain>:<hex>"));
        }
        // workchain_id is int8 on the wire
        let workchain = parts[0]
            .parse::<i8>()
            .map_err(|_| invalid(s, "workchain is not an int8"))?;
        let bytes = hex::decode(parts[1]).map_err(|_| invalid(s, "hash part is not hex"))?;
        if bytes.len() != 32 {
            return Err(invalid(s, "hash part must be 32 bytes"));
        }
        let mut hash_part = [0u8; 32];
        hash_part.copy_from_slice(&bytes);
        Ok(TonAddress::new(workchain.into(), &hash_part))
    }

    pub fn from_base64(s: &str) -> Result<(TonAddress, TonAddressFlags), TonCellError> {
        if s.len() != 48 {
            return Err(invalid(s, "friendly address must be 48 characters"));
        }
        let config = if s.contains('-') || s.contains('_') {
            base64::URL_SAFE
        } else {
            base64::STANDARD
        };
        let bytes = base64::decode_config(s, config).map_err(|_| invalid(s, "bad base64"))?;
        if bytes.len() != 36 {
            return Err(invalid(s, "friendly address must decode to 36 bytes"));
        }

        let crc = CRC16.checksum(&bytes[..34]);
        if crc.to_be_bytes() != bytes[34..36] {
            return Err(invalid(s, "checksum mismatch"));
        }

        let testnet = bytes[0] & FLAG_TESTNET != 0;
        let bounceable = match bytes[0] & !FLAG_TESTNET {
            FLAG_BOUNCEABLE => true,
            FLAG_NON_BOUNCEABLE => false,
            _ => return Err(invalid(s, "unknown flag byte")),
        };
        let workchain = bytes[1] as i8 as i32;
        let mut hash_part = [0u8; 32];
        hash_part.copy_from_slice(&bytes[2..34]);

        Ok((
            TonAddress::new(workchain, &hash_part),
            TonAddressFlags {
                bounceable,
                testnet,
            },
        ))
    }

    pub fn to_hex(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash_part))
    }

    pub fn to_base64_url_flags(&self, non_bounceable: bool, non_production: bool) -> String {
        base64::encode_config(self.friendly_bytes(non_bounceable, non_production), base64::URL_SAFE)
    }

    fn friendly_bytes(&self, non_bounceable: bool, non_production: bool) -> [u8; 36] {
        let mut bytes = [0u8; 36];
        let mut tag = if non_bounceable {
            FLAG_NON_BOUNCEABLE
        } else {
            FLAG_BOUNCEABLE
        };
        if non_production {
            tag |= FLAG_TESTNET;
        }
        bytes[0] = tag;
        bytes[1] = (self.workchain & 0xff) as u8;
        bytes[2..34].copy_from_slice(&self.hash_part);
        let crc = CRC16.checksum(&bytes[..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        bytes
    }
}

impl FromStr for TonAddress {
    type Err = TonCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_flags(s).map(|(address, _)| address)
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64_url_flags(false, false))
    }
}

impl fmt::Debug for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn invalid(s: &str, reason: &str) -> TonCellError {
    TonCellError::InvalidAddress(format!("{}: {}", s, reason))
}
