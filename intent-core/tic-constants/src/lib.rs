pub mod chain_info;
pub mod curve;
pub mod policy;

pub use chain_info::{
    chain_info_from_name, load_chain_infos, registry_snapshot, ChainContext, ChainRegistry,
    ChainType, FeeToken, Network,
};
pub use curve::CurveType;
pub use policy::{set_transfer_policy, transfer_policy, TransferPolicy};

pub type Result<T> = anyhow::Result<T>;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate tic_common;

pub const TEST_PRIVATE_KEY: &str =
    "cce64585e3b15a0e4ee601a467e050c9504a0db69a559d7ec416fa25ad3410c2";
/// Compressed secp256k1 public key of `TEST_PRIVATE_KEY`.
pub const TEST_PRIVATE_KEY_PUBLIC: &str =
    "0280c98b8ea7cab630defb0c09a4295c2193cdee016c1d5b9b0cb18572b9c370fe";
pub const TEST_PRIVATE_KEY_COSMOS_ADDRESS: &str = "cosmos18grgt9ryg7qp8kyruyqc2wrwy733tteahnd88s";
pub const TEST_PRIVATE_KEY_OSMO_ADDRESS: &str = "osmo18grgt9ryg7qp8kyruyqc2wrwy733ttealg7h3z";

pub const TEST_COSMOS_PUBLIC_KEY: &str =
    "037a525043e79a9051d58214a9a2a70b657b3d49124dcd0acc4730df5f35d74b32";
pub const TEST_COSMOS_ADDRESS: &str = "cosmos1pt9904aqg739q6p9kgc2v0puqvj6atp0zsj70g";

pub const TEST_TON_PUBLIC_KEY: &str =
    "8dcc5a70ba6ccb4ac1704fec5479327100065c9fab8ef173cc64aea3459fb87b";
pub const TEST_TON_ADDRESS: &str = "UQCpecuOS5riOEjasciyaOkKUdjjvIjsPjhxWsk4z9oy6rV8";
