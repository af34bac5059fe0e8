//! Entry point for wallets: per-chain services that turn a transfer request
//! into a prepared intent with its fee, then sign it.
#[macro_use]
extern crate tic_common;

pub mod cache;
pub mod config;
pub mod cosmos;
pub mod session;
pub mod ton;

pub use crate::cache::{ClientCache, ClientConnector};
pub use crate::config::init_intent_core;
pub use crate::cosmos::CosmosTransferService;
pub use crate::session::TransferSession;
pub use crate::ton::TonTransferService;

pub type Result<T> = anyhow::Result<T>;
