use serde::Deserialize;
use serde_json::Value;
use tic_constants::{load_chain_infos, set_transfer_policy, TransferPolicy};

use crate::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IntentCoreConfig {
    chains: Option<Value>,
    policy: Option<TransferPolicy>,
}

/// Loads `{"chains": [...], "policy": {...}}` into the process-wide registry
/// and policy. Both keys are optional.
pub fn init_intent_core(json: &str) -> Result<()> {
    let config: IntentCoreConfig = serde_json::from_str(json)?;
    if let Some(policy) = &config.policy {
        policy.validate()?;
    }
    if let Some(chains) = config.chains {
        load_chain_infos(&chains.to_string())?;
    }
    if let Some(policy) = config.policy {
        set_transfer_policy(policy)?;
    }
    Ok(())
}
