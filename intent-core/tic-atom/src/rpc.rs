use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tic_common::Coin;
use tic_keystore::Result;

use crate::proto::{Any, SignDoc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasInfo {
    pub gas_used: u64,
}

/// On-chain auth state of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Queries against one Cosmos chain. Implementations report transport
/// failures as `TransferError::RpcUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CosmosRpc: Send + Sync {
    async fn get_account_info(&self, address: &str) -> Result<AccountInfo>;

    async fn get_balances(&self, address: &str) -> Result<Vec<Coin>>;

    async fn estimate_gas(
        &self,
        msgs: Vec<Any>,
        memo: String,
        pubkey: Vec<u8>,
        sequence: u64,
    ) -> Result<GasInfo>;

    /// Channel on `source_chain_id` whose counterparty is `dest_chain_id`.
    async fn get_source_channel_id(
        &self,
        source_chain_id: &str,
        dest_chain_id: &str,
    ) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectSignResponse {
    pub signed: SignDoc,
    /// base64 encoded 64 byte signature
    pub signature: String,
}

/// Wallet extension (or local key) signing a `SignDoc` in direct mode.
#[async_trait]
pub trait CosmosWalletSigner: Send + Sync {
    async fn sign_direct(&self, address: &str, sign_doc: SignDoc) -> Result<DirectSignResponse>;

    /// Compressed secp256k1 public key of `address`.
    async fn public_key(&self, address: &str) -> Result<Vec<u8>>;
}
