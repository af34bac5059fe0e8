use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tic_keystore::Result;
use tonlib_core::cell::ArcCell;

/// Argument or result of a get-method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvmStackEntry {
    Number(u128),
    Cell(ArcCell),
    Slice(ArcCell),
}

/// Dry run of an external message, signature checks disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateFeeRequest {
    /// base64 BOC of the wallet body
    pub body: String,
    pub init_code: Option<String>,
    pub init_data: Option<String>,
    pub ignore_chksig: bool,
}

/// Source fees reported by the node, all in nanoton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub in_fwd_fee: u128,
    pub storage_fee: u128,
    pub gas_fee: u128,
    pub fwd_fee: u128,
}

impl FeeBreakdown {
    pub fn total(&self) -> u128 {
        self.in_fwd_fee
            .saturating_add(self.storage_fee)
            .saturating_add(self.gas_fee)
            .saturating_add(self.fwd_fee)
    }
}

/// Queries against a TON node (toncenter style). Addresses are passed in
/// raw `wc:hex` form; transport failures surface as
/// `TransferError::RpcUnavailable`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TonRpc: Send + Sync {
    async fn get_balance(&self, address: &str) -> Result<u128>;

    async fn is_deployed(&self, address: &str) -> Result<bool>;

    async fn get_seqno(&self, address: &str) -> Result<u32>;

    async fn run_get_method(
        &self,
        address: &str,
        method: &str,
        stack: Vec<TvmStackEntry>,
    ) -> Result<Vec<TvmStackEntry>>;

    async fn estimate_fee(
        &self,
        address: &str,
        request: EstimateFeeRequest,
    ) -> Result<FeeBreakdown>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_total() {
        let fees = FeeBreakdown {
            in_fwd_fee: 1_000_000,
            storage_fee: 1,
            gas_fee: 3_000_000,
            fwd_fee: 400_000,
        };
        assert_eq!(fees.total(), 4_400_001);
    }

    #[test]
    fn test_fee_breakdown_json() {
        let fees: FeeBreakdown = serde_json::from_str(
            r#"{"inFwdFee":1,"storageFee":2,"gasFee":3,"fwdFee":4}"#,
        )
        .unwrap();
        assert_eq!(fees.total(), 10);
    }
}
