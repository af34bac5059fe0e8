use core::str::FromStr;

use bech32::{FromBase32, ToBase32, Variant};
use tic_common::{hash160, TransferError};
use tic_constants::ChainContext;
use tic_keystore::{Address, Result};

// size of an account address, contract addresses are 32 bytes
pub const LENGTH: usize = 20;
pub const CONTRACT_LENGTH: usize = 32;

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AtomAddress(String);

impl AtomAddress {
    pub fn encode(prefix: &str, data: &[u8]) -> Result<Self> {
        Ok(AtomAddress(bech32::encode(
            prefix,
            data.to_base32(),
            Variant::Bech32,
        )?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Address for AtomAddress {
    fn from_public_key(public_key: &[u8], chain: &ChainContext) -> Result<Self> {
        tic_ensure!(public_key.len() == 33, tic_keystore::Error::InvalidPublicKey);
        Self::encode(&chain.bech32_prefix, &hash160(public_key))
    }

    fn is_valid(address: &str, chain: &ChainContext) -> bool {
        match decode(address) {
            Ok((hrp, data)) => {
                hrp == chain.bech32_prefix
                    && (data.len() == LENGTH || data.len() == CONTRACT_LENGTH)
            }
            Err(_) => false,
        }
    }
}

/// Splits a bech32 address into its human readable prefix and payload.
pub fn decode(address: &str) -> Result<(String, Vec<u8>)> {
    let (hrp, data, variant) =
        bech32::decode(address).map_err(|_| TransferError::InvalidAddress)?;
    tic_ensure!(variant == Variant::Bech32, TransferError::InvalidAddress);
    let data = Vec::from_base32(&data).map_err(|_| TransferError::InvalidAddress)?;
    Ok((hrp, data))
}

/// Prefix of a decodable bech32 address.
pub fn prefix_of(address: &str) -> Option<String> {
    decode(address).ok().map(|(hrp, _)| hrp)
}

impl FromStr for AtomAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        decode(s)?;
        Ok(AtomAddress(s.to_string()))
    }
}

impl ToString for AtomAddress {
    fn to_string(&self) -> String {
        self.0.clone()
    }
}
