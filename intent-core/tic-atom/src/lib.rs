//! Cosmos pipeline: bech32 addresses, intent classification, gas simulation
//! and direct-mode signing.
#[macro_use]
extern crate tic_common;

pub mod account;
pub mod address;
pub mod builder;
pub mod fee;
pub mod message;
pub mod proto;
pub mod rpc;
pub mod signer;

pub use crate::account::{ensure_sequence, fetch_account, CosmosAccount};
pub use crate::address::AtomAddress;
pub use crate::builder::{classify, Classification, CosmosIntentBuilder};
pub use crate::fee::{calculate_fee, gas_limit, gas_price, CosmosFeeEstimator};
pub use crate::rpc::{AccountInfo, CosmosRpc, CosmosWalletSigner, DirectSignResponse, GasInfo};
pub use crate::signer::{build_sign_doc, sign_with, CosmosSignedResult, LocalCosmosWalletSigner};
