//! Key handling shared by the chain crates: the address derivation contract
//! and in-process signers holding a raw private key.
use core::str::FromStr;

use thiserror::Error;

use tic_constants::ChainContext;

mod signer;

pub use signer::{HashSigner, LocalEd25519Signer, LocalSecp256k1Signer};

pub type Result<T> = anyhow::Result<T>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid_private_key")]
    InvalidPrivateKey,
    #[error("invalid_public_key")]
    InvalidPublicKey,
    #[error("invalid_hash_length")]
    InvalidHashLength,
}

pub trait Address: ToString + FromStr + Sized + Clone + PartialEq + Eq {
    fn from_public_key(public_key: &[u8], chain: &ChainContext) -> Result<Self>;

    fn is_valid(address: &str, chain: &ChainContext) -> bool;
}
