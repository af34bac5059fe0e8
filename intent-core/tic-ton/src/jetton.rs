use tic_common::{transfer_error, TransferError};
use tic_keystore::Result;
use tonlib_core::cell::{ArcCell, CellBuilder};
use tonlib_core::types::TonAddress as TonAddressLib;

use crate::rpc::{TonRpc, TvmStackEntry};

pub const JETTON_TRANSFER_OP: u32 = 0x0f8a7ea5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JettonTransferBody {
    pub query_id: u64,
    pub amount: u128,
    pub destination: TonAddressLib,
    pub response_destination: TonAddressLib,
    pub forward_ton_amount: u128,
}

/// TEP-74 `transfer` with neither custom nor forward payload.
pub fn jetton_transfer_body(body: &JettonTransferBody) -> Result<ArcCell> {
    let mut builder = CellBuilder::new();
    builder
        .store_u32(32, JETTON_TRANSFER_OP)?
        .store_u64(64, body.query_id)?
        .store_coins(body.amount)?
        .store_address(&body.destination)?
        .store_address(&body.response_destination)?
        .store_bit(false)? // custom_payload
        .store_coins(body.forward_ton_amount)?
        .store_bit(false)?; // forward_payload inline and empty
    Ok(builder.build()?.to_arc())
}

/// Jetton wallet of `owner`, asked from the master's `get_wallet_address`.
/// Never cached: the answer depends on both the master and the owner.
pub async fn resolve_jetton_wallet(
    master: &TonAddressLib,
    owner: &TonAddressLib,
    rpc: &dyn TonRpc,
) -> Result<TonAddressLib> {
    let owner_slice = CellBuilder::new().store_address(owner)?.build()?.to_arc();
    let stack = rpc
        .run_get_method(
            &master.to_hex(),
            "get_wallet_address",
            vec![TvmStackEntry::Slice(owner_slice)],
        )
        .await
        .map_err(|err| unsupported_unless_unavailable(err, "get_wallet_address"))?;

    let cell = match stack.first() {
        Some(TvmStackEntry::Slice(cell)) | Some(TvmStackEntry::Cell(cell)) => cell.clone(),
        _ => return Err(TransferError::UnsupportedAsset.into()),
    };
    let address = cell
        .parser()
        .load_address()?
        .ok_or(TransferError::UnsupportedAsset)?;
    log::debug!(
        "jetton wallet of {} under {} is {}",
        owner.to_hex(),
        master.to_hex(),
        address.to_hex()
    );
    Ok(address)
}

/// Balance held by a jetton wallet, from `get_wallet_data`.
pub async fn jetton_balance(jetton_wallet: &TonAddressLib, rpc: &dyn TonRpc) -> Result<u128> {
    let stack = rpc
        .run_get_method(&jetton_wallet.to_hex(), "get_wallet_data", vec![])
        .await
        .map_err(|err| unsupported_unless_unavailable(err, "get_wallet_data"))?;
    match stack.first() {
        Some(TvmStackEntry::Number(balance)) => Ok(*balance),
        _ => Err(TransferError::UnsupportedAsset.into()),
    }
}

fn unsupported_unless_unavailable(err: anyhow::Error, method: &str) -> anyhow::Error {
    match transfer_error(&err) {
        Some(TransferError::RpcUnavailable(_)) => err,
        _ => {
            log::warn!("{} failed: {}", method, err);
            TransferError::UnsupportedAsset.into()
        }
    }
}
