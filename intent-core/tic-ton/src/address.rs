use core::str::FromStr;

use tic_common::TransferError;
use tic_constants::ChainContext;
use tic_keystore::{Address, Result};
use tonlib_core::types::{TonAddress as TonAddressLib, TonAddressFlags};

use crate::wallet::TonWallet;

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TonAddress(String);

impl Address for TonAddress {
    fn from_public_key(public_key: &[u8], chain: &ChainContext) -> Result<Self> {
        let wallet = TonWallet::from_public_key(public_key, chain)?;
        Ok(TonAddress(wallet.friendly_address()))
    }

    fn is_valid(address: &str, _chain: &ChainContext) -> bool {
        TonAddressLib::parse_with_flags(address).is_ok()
    }
}

/// Parses a raw or user-friendly address.
pub fn parse_address(address: &str) -> Result<(TonAddressLib, Option<TonAddressFlags>)> {
    TonAddressLib::parse_with_flags(address.trim())
        .map_err(|_| TransferError::InvalidAddress.into())
}

/// Bounce flag a message to `address` should carry: what the friendly form
/// says, bounceable for the raw form.
pub fn bounce_for(address: &str) -> Result<bool> {
    let (_, flags) = parse_address(address)?;
    Ok(flags.map_or(true, |flags| flags.bounceable))
}

impl FromStr for TonAddress {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_address(s)?;
        Ok(TonAddress(s.trim().to_string()))
    }
}

impl ToString for TonAddress {
    fn to_string(&self) -> String {
        self.0.clone()
    }
}
