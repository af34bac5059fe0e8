//! TON pipeline: wallet addresses, native and jetton transfers, fee dry runs
//! and external message signing.
#[macro_use]
extern crate tic_common;

pub mod account;
pub mod address;
pub mod builder;
pub mod fee;
pub mod jetton;
pub mod message;
pub mod rpc;
pub mod signer;
pub mod wallet;

pub use crate::account::{fetch_account, SeqnoTicket, TonAccount};
pub use crate::address::TonAddress;
pub use crate::builder::{classify, TonClassification, TonIntentBuilder};
pub use crate::fee::TonFeeEstimator;
pub use crate::message::{
    WalletTransfer, SEND_MODE_CARRY_ALL_REMAINING_BALANCE, SEND_MODE_IGNORE_ERRORS,
    SEND_MODE_PAY_GAS_SEPARATELY,
};
pub use crate::rpc::{EstimateFeeRequest, FeeBreakdown, TonRpc, TvmStackEntry};
pub use crate::signer::{sign_transfer, wallet_transfer, TonSignedResult};
pub use crate::wallet::TonWallet;
