use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tic_common::TransferError;

use crate::Result;

pub const DEFAULT_IBC_TIMEOUT_SECS: u64 = 120;
/// One week.
pub const MAX_IBC_TIMEOUT_SECS: u64 = 7 * 24 * 3600;
pub const DEFAULT_GAS_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_JETTON_SYMBOL: &str = "AIOTX";
pub const DEFAULT_JETTON_MASTER: &str = "kQAiboDEv_qRrcEdrYdwbVLNOXBHwShFbtKGbQVJ2OKxY_Di";
/// 0.05 TON attached to the jetton wallet call for gas.
pub const DEFAULT_JETTON_ATTACHED_VALUE: u128 = 50_000_000;
pub const DEFAULT_TON_MESSAGE_TTL_SECS: u64 = 600;
/// `PAY_GAS_SEPARATELY | IGNORE_ERRORS`
pub const DEFAULT_SEND_MODE: u8 = 3;

/// Tunables of the transfer pipelines. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferPolicy {
    pub ibc_timeout_secs: u64,
    pub gas_multiplier: f64,
    pub jetton_symbol: String,
    pub jetton_master: String,
    pub jetton_attached_value: u128,
    pub ton_message_ttl_secs: u64,
    pub default_send_mode: u8,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        TransferPolicy {
            ibc_timeout_secs: DEFAULT_IBC_TIMEOUT_SECS,
            gas_multiplier: DEFAULT_GAS_MULTIPLIER,
            jetton_symbol: DEFAULT_JETTON_SYMBOL.to_string(),
            jetton_master: DEFAULT_JETTON_MASTER.to_string(),
            jetton_attached_value: DEFAULT_JETTON_ATTACHED_VALUE,
            ton_message_ttl_secs: DEFAULT_TON_MESSAGE_TTL_SECS,
            default_send_mode: DEFAULT_SEND_MODE,
        }
    }
}

impl TransferPolicy {
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: TransferPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        tic_ensure!(
            self.ibc_timeout_secs > 0 && self.ibc_timeout_secs <= MAX_IBC_TIMEOUT_SECS,
            TransferError::InvalidPolicy(format!(
                "ibc timeout must be within 1..={}s, got {}",
                MAX_IBC_TIMEOUT_SECS, self.ibc_timeout_secs
            ))
        );
        tic_ensure!(
            self.gas_multiplier.is_finite() && self.gas_multiplier > 0.0,
            TransferError::InvalidPolicy(format!(
                "gas multiplier must be positive, got {}",
                self.gas_multiplier
            ))
        );
        Ok(())
    }
}

lazy_static! {
    static ref TRANSFER_POLICY: RwLock<TransferPolicy> = RwLock::new(TransferPolicy::default());
}

pub fn set_transfer_policy(policy: TransferPolicy) -> Result<()> {
    policy.validate()?;
    log::info!("transfer policy updated: {:?}", policy);
    *TRANSFER_POLICY.write() = policy;
    Ok(())
}

pub fn transfer_policy() -> TransferPolicy {
    TRANSFER_POLICY.read().clone()
}
