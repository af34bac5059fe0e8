use tic_common::{transfer_error, FeeEstimate, TransferError};
use tic_constants::ChainContext;
use tic_keystore::Result;
use tonlib_core::cell::{ArcCell, BagOfCells};

use crate::message::{signed_body, WalletTransfer, SIGNATURE_LEN};
use crate::rpc::{EstimateFeeRequest, TonRpc};
use crate::wallet::TonWallet;

fn to_boc(cell: &ArcCell) -> Result<String> {
    Ok(BagOfCells::new(&[cell.clone()]).to_base64()?)
}

/// Prices the exact wallet body that will be signed, with a zero signature.
pub struct TonFeeEstimator;

impl TonFeeEstimator {
    pub async fn estimate(
        &self,
        chain: &ChainContext,
        wallet: &TonWallet,
        transfer: &WalletTransfer,
        deployed: bool,
        rpc: &dyn TonRpc,
    ) -> Result<FeeEstimate> {
        let body = signed_body(
            wallet.version,
            &transfer.signing_message()?,
            &[0u8; SIGNATURE_LEN],
        )?;
        let (init_code, init_data) = if deployed {
            (None, None)
        } else {
            (Some(to_boc(&wallet.code()?)?), Some(to_boc(&wallet.data()?)?))
        };
        let request = EstimateFeeRequest {
            body: to_boc(&body)?,
            init_code,
            init_data,
            ignore_chksig: true,
        };

        let fees = match rpc.estimate_fee(&wallet.address.to_hex(), request).await {
            Ok(fees) => fees,
            Err(err) => {
                return match transfer_error(&err) {
                    Some(TransferError::RpcUnavailable(_))
                    | Some(TransferError::SimulationFailed(_)) => Err(err),
                    _ => Err(TransferError::SimulationFailed(err.to_string()).into()),
                }
            }
        };
        log::debug!(
            "{} fee for seqno {}: {:?}",
            chain.chain_name,
            transfer.seqno,
            fees
        );

        Ok(FeeEstimate {
            gas_limit: None,
            amount: fees.total(),
            denom: chain.fee_token.denom.clone(),
        })
    }
}
