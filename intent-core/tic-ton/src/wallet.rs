use std::str::FromStr;

use tic_constants::ChainContext;
use tic_keystore::Result;
use tonlib_core::cell::ArcCell;
use tonlib_core::types::TonAddress as TonAddressLib;
use tonlib_core::wallet::WalletVersion;

/// The sender's wallet contract, derived from its ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonWallet {
    pub version: WalletVersion,
    pub wallet_id: i32,
    pub public_key: Vec<u8>,
    pub address: TonAddressLib,
    pub testnet: bool,
}

impl TonWallet {
    pub fn from_public_key(public_key: &[u8], chain: &ChainContext) -> Result<Self> {
        tic_ensure!(public_key.len() == 32, tic_keystore::Error::InvalidPublicKey);
        let version = WalletVersion::from_str(&chain.wallet_version)?;
        let wallet_id = version.default_wallet_id();
        let address = version.address(public_key, wallet_id)?;
        Ok(TonWallet {
            version,
            wallet_id,
            public_key: public_key.to_vec(),
            address,
            testnet: chain.is_testnet(),
        })
    }

    /// Non-bounceable user-friendly form, flagged for testnet when needed.
    pub fn friendly_address(&self) -> String {
        self.address.to_base64_url_flags(true, self.testnet)
    }

    /// `StateInit` attached to the first external message of an undeployed wallet.
    pub fn state_init(&self) -> Result<ArcCell> {
        Ok(self.version.state_init(&self.public_key, self.wallet_id)?)
    }

    pub fn code(&self) -> Result<ArcCell> {
        Ok(self.version.code()?)
    }

    pub fn data(&self) -> Result<ArcCell> {
        Ok(self.version.initial_data(&self.public_key, self.wallet_id)?)
    }
}
