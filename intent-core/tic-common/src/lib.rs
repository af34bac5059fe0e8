#[macro_use]
mod macros {
    #[macro_export]
    macro_rules! tic_ensure {
        ($cond:expr, $e:expr) => {
            if !($cond) {
                return Err($e.into());
            }
        };
    }
}

mod amount;
mod errors;
mod hash;
mod hex;
mod model;
mod time;

pub use crate::amount::{parse_integer_amount, parse_units};
pub use crate::errors::{transfer_error, TransferError};
pub use crate::hash::{hash160, sha256};
pub use crate::hex::{decode_hex, ToHex};
pub use crate::model::{
    Coin, ContractExecuteTransfer, FeeEstimate, IbcTransfer, JettonTransfer, NativeSend,
    TonNativeTransfer, TransferIntent, TransferRequest,
};
pub use crate::time::{unix_timestamp, Clock, FixedClock, SystemClock};

pub type Result<T> = anyhow::Result<T>;
