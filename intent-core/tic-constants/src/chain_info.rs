use std::{fmt, str::FromStr};

use anyhow::anyhow;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tic_common::TransferError;

use crate::curve::CurveType;
use crate::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainType {
    Cosmos,
    Ton,
}

impl FromStr for ChainType {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> std::result::Result<ChainType, Self::Err> {
        match input {
            "COSMOS" => Ok(ChainType::Cosmos),
            "TON" => Ok(ChainType::Ton),
            _ => Err(anyhow!("unknown_chain_type")),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain_type_str = match self {
            ChainType::Cosmos => "COSMOS",
            ChainType::Ton => "TON",
        };
        write!(f, "{}", chain_type_str)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> std::result::Result<Network, Self::Err> {
        match input {
            "MAINNET" => Ok(Network::Mainnet),
            "TESTNET" => Ok(Network::Testnet),
            _ => Err(anyhow!("unknown_network")),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "MAINNET"),
            Network::Testnet => write!(f, "TESTNET"),
        }
    }
}

/// Fee currency of a chain with the gas prices its registry entry publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeeToken {
    pub denom: String,
    #[serde(default)]
    pub fixed_min_gas_price: Option<f64>,
    #[serde(default)]
    pub low_gas_price: Option<f64>,
    #[serde(default)]
    pub average_gas_price: Option<f64>,
    #[serde(default)]
    pub high_gas_price: Option<f64>,
}

/// Immutable description of one chain. Looked up from the registry by name,
/// chain id or bech32 prefix and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContext {
    pub chain_name: String,
    pub chain_id: String,
    pub chain_type: ChainType,
    #[serde(default)]
    pub network: Network,
    pub curve: CurveType,
    #[serde(default)]
    pub bech32_prefix: String,
    pub fee_token: FeeToken,
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,
    pub slip44: u32,
    /// TON wallet contract, e.g. `V5R1`. Empty for Cosmos chains.
    #[serde(default)]
    pub wallet_version: String,
}

impl ChainContext {
    pub fn is_testnet(&self) -> bool {
        self.network == Network::Testnet
    }
}

/// Ordered list of known chains. Later registrations replace earlier entries
/// with the same `chain_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRegistry {
    chains: Vec<ChainContext>,
}

impl ChainRegistry {
    pub fn empty() -> Self {
        ChainRegistry { chains: Vec::new() }
    }

    pub fn register(&mut self, chain: ChainContext) {
        match self
            .chains
            .iter_mut()
            .find(|c| c.chain_name == chain.chain_name)
        {
            Some(existing) => *existing = chain,
            None => self.chains.push(chain),
        }
    }

    /// Registers every entry of a JSON array of chain contexts.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let chains: Vec<ChainContext> = serde_json::from_str(json)?;
        let count = chains.len();
        for chain in chains {
            self.register(chain);
        }
        Ok(count)
    }

    pub fn lookup(&self, name: &str) -> Option<ChainContext> {
        self.chains.iter().find(|c| c.chain_name == name).cloned()
    }

    pub fn lookup_by_chain_id(&self, chain_id: &str) -> Option<ChainContext> {
        self.chains.iter().find(|c| c.chain_id == chain_id).cloned()
    }

    /// First Cosmos chain using `prefix` for its bech32 addresses.
    pub fn lookup_by_prefix(&self, prefix: &str) -> Option<ChainContext> {
        self.chains
            .iter()
            .find(|c| c.chain_type == ChainType::Cosmos && c.bech32_prefix == prefix)
            .cloned()
    }

    pub fn require(&self, name: &str) -> Result<ChainContext> {
        self.lookup(name)
            .ok_or_else(|| TransferError::UnknownChain.into())
    }

    pub fn chains(&self) -> &[ChainContext] {
        &self.chains
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        let mut chains = Vec::new();
        chains.push(ChainContext {
            chain_name: "cosmoshub".to_string(),
            chain_id: "cosmoshub-4".to_string(),
            chain_type: ChainType::Cosmos,
            network: Network::Mainnet,
            curve: CurveType::SECP256k1,
            bech32_prefix: "cosmos".to_string(),
            fee_token: FeeToken {
                denom: "uatom".to_string(),
                fixed_min_gas_price: Some(0.005),
                low_gas_price: Some(0.01),
                average_gas_price: Some(0.025),
                high_gas_price: Some(0.03),
            },
            rpc_endpoints: vec!["https://cosmos-rpc.publicnode.com:443".to_string()],
            slip44: 118,
            wallet_version: String::new(),
        });
        chains.push(ChainContext {
            chain_name: "osmosis".to_string(),
            chain_id: "osmosis-1".to_string(),
            chain_type: ChainType::Cosmos,
            network: Network::Mainnet,
            curve: CurveType::SECP256k1,
            bech32_prefix: "osmo".to_string(),
            fee_token: FeeToken {
                denom: "uosmo".to_string(),
                fixed_min_gas_price: Some(0.0025),
                low_gas_price: Some(0.0025),
                average_gas_price: Some(0.025),
                high_gas_price: Some(0.04),
            },
            rpc_endpoints: vec!["https://osmosis-rpc.publicnode.com:443".to_string()],
            slip44: 118,
            wallet_version: String::new(),
        });
        chains.push(ChainContext {
            chain_name: "juno".to_string(),
            chain_id: "juno-1".to_string(),
            chain_type: ChainType::Cosmos,
            network: Network::Mainnet,
            curve: CurveType::SECP256k1,
            bech32_prefix: "juno".to_string(),
            fee_token: FeeToken {
                denom: "ujuno".to_string(),
                fixed_min_gas_price: Some(0.075),
                low_gas_price: Some(0.075),
                average_gas_price: Some(0.1),
                high_gas_price: Some(0.125),
            },
            rpc_endpoints: vec!["https://juno-rpc.publicnode.com:443".to_string()],
            slip44: 118,
            wallet_version: String::new(),
        });
        chains.push(ChainContext {
            chain_name: "ton".to_string(),
            chain_id: "-239".to_string(),
            chain_type: ChainType::Ton,
            network: Network::Mainnet,
            curve: CurveType::ED25519,
            bech32_prefix: String::new(),
            fee_token: FeeToken {
                denom: "nanoton".to_string(),
                ..FeeToken::default()
            },
            rpc_endpoints: vec!["https://toncenter.com/api/v2/jsonRPC".to_string()],
            slip44: 607,
            wallet_version: "V5R1".to_string(),
        });
        chains.push(ChainContext {
            chain_name: "ton-testnet".to_string(),
            chain_id: "-3".to_string(),
            chain_type: ChainType::Ton,
            network: Network::Testnet,
            curve: CurveType::ED25519,
            bech32_prefix: String::new(),
            fee_token: FeeToken {
                denom: "nanoton".to_string(),
                ..FeeToken::default()
            },
            rpc_endpoints: vec!["https://testnet.toncenter.com/api/v2/jsonRPC".to_string()],
            slip44: 607,
            wallet_version: "V5R1".to_string(),
        });
        ChainRegistry { chains }
    }
}

lazy_static! {
    static ref CHAIN_INFOS: RwLock<ChainRegistry> = RwLock::new(ChainRegistry::default());
}

/// Adds or replaces entries of the process-wide registry.
pub fn load_chain_infos(json: &str) -> Result<usize> {
    let count = CHAIN_INFOS.write().load_json(json)?;
    log::info!("registered {} chain entries", count);
    Ok(count)
}

pub fn chain_info_from_name(name: &str) -> Result<ChainContext> {
    CHAIN_INFOS.read().require(name)
}

/// Copy of the process-wide registry, detached from later registrations.
pub fn registry_snapshot() -> ChainRegistry {
    CHAIN_INFOS.read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tic_common::transfer_error;

    #[test]
    fn test_network_str() {
        assert_ne!("Mainnet", Network::Mainnet.to_string());
        assert_eq!("MAINNET", Network::Mainnet.to_string());
        assert_eq!("TESTNET".parse::<Network>().unwrap(), Network::Testnet);
    }

    #[test]
    fn test_builtin_lookups() {
        let registry = ChainRegistry::default();
        let hub = registry.lookup("cosmoshub").unwrap();
        assert_eq!(hub.chain_id, "cosmoshub-4");
        assert_eq!(hub.fee_token.denom, "uatom");

        let osmo = registry.lookup_by_prefix("osmo").unwrap();
        assert_eq!(osmo.chain_name, "osmosis");
        assert_eq!(
            registry.lookup_by_chain_id("juno-1").unwrap().bech32_prefix,
            "juno"
        );
        assert!(registry.lookup_by_prefix("").is_none());
        assert!(registry.lookup("bitcoin").is_none());
        assert!(registry.lookup("ton-testnet").unwrap().is_testnet());
    }

    #[test]
    fn test_require_unknown_chain() {
        let err = ChainRegistry::default().require("nope").unwrap_err();
        assert_eq!(transfer_error(&err), Some(&TransferError::UnknownChain));
    }

    #[test]
    fn test_load_json_replaces_and_appends() {
        let mut registry = ChainRegistry::default();
        let count = registry
            .load_json(
                r#"[
                {"chainName":"osmosis","chainId":"osmo-test-5","chainType":"COSMOS","network":"TESTNET",
                 "curve":"SECP256k1","bech32Prefix":"osmo","feeToken":{"denom":"uosmo","lowGasPrice":0.0025},
                 "slip44":118},
                {"chainName":"stargaze","chainId":"stargaze-1","chainType":"COSMOS",
                 "curve":"SECP256k1","bech32Prefix":"stars","feeToken":{"denom":"ustars"},"slip44":118}
            ]"#,
            )
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            registry.lookup("osmosis").unwrap().chain_id,
            "osmo-test-5"
        );
        let stars = registry.lookup_by_prefix("stars").unwrap();
        assert_eq!(stars.network, Network::Mainnet);
        assert!(stars.fee_token.average_gas_price.is_none());
        assert_eq!(registry.chains().len(), 6);
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        assert!(ChainRegistry::default().load_json("{").is_err());
    }
}
