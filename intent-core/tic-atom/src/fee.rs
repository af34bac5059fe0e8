use tic_common::{transfer_error, FeeEstimate, TransferError, TransferIntent};
use tic_constants::{ChainContext, FeeToken, TransferPolicy};
use tic_keystore::Result;

use crate::message::intent_to_any;
use crate::rpc::{AccountInfo, CosmosRpc};

/// Gas price used for a chain: average, falling back to low, high, then the
/// fixed minimum. Zero when the chain publishes none.
pub fn gas_price(fee_token: &FeeToken) -> f64 {
    [
        fee_token.average_gas_price,
        fee_token.low_gas_price,
        fee_token.high_gas_price,
        fee_token.fixed_min_gas_price,
    ]
    .iter()
    .flatten()
    .copied()
    .find(|price| price.is_finite() && *price >= 0.0)
    .unwrap_or(0.0)
}

pub fn gas_limit(gas_used: u64, multiplier: f64) -> Result<u64> {
    tic_ensure!(
        multiplier.is_finite() && multiplier > 0.0,
        TransferError::InvalidPolicy(format!("gas multiplier {}", multiplier))
    );
    Ok((gas_used as f64 * multiplier).round() as u64)
}

/// `ceil(gas_limit * price)` computed on the decimal form of `price`, so
/// `150000 * 0.025` is exactly 3750.
pub fn calculate_fee(gas_limit: u64, price: f64) -> Result<u128> {
    let (numerator, denominator) = decimal_fraction(price)?;
    let scaled = (gas_limit as u128)
        .checked_mul(numerator)
        .ok_or(TransferError::InvalidAmount)?;
    Ok(scaled / denominator + u128::from(scaled % denominator != 0))
}

fn decimal_fraction(value: f64) -> Result<(u128, u128)> {
    tic_ensure!(
        value.is_finite() && value >= 0.0,
        TransferError::InvalidAmount
    );
    // f64 Display never uses exponent notation
    let text = value.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let denominator = 10u128
        .checked_pow(frac_part.len() as u32)
        .ok_or(TransferError::InvalidAmount)?;
    let numerator = format!("{}{}", int_part, frac_part)
        .parse::<u128>()
        .map_err(|_| TransferError::InvalidAmount)?;
    Ok((numerator, denominator))
}

pub struct CosmosFeeEstimator<'a> {
    policy: &'a TransferPolicy,
}

impl<'a> CosmosFeeEstimator<'a> {
    pub fn new(policy: &'a TransferPolicy) -> Self {
        CosmosFeeEstimator { policy }
    }

    /// Simulates `intent` as the only message of the tx and prices the
    /// padded gas limit in the chain fee denom.
    pub async fn estimate(
        &self,
        chain: &ChainContext,
        intent: &TransferIntent,
        memo: &str,
        public_key: &[u8],
        account: &AccountInfo,
        rpc: &dyn CosmosRpc,
    ) -> Result<FeeEstimate> {
        let msg = intent_to_any(intent)?;
        let gas = match rpc
            .estimate_gas(
                vec![msg],
                memo.to_string(),
                public_key.to_vec(),
                account.sequence,
            )
            .await
        {
            Ok(gas) => gas,
            Err(err) => {
                return match transfer_error(&err) {
                    Some(TransferError::RpcUnavailable(_))
                    | Some(TransferError::SimulationFailed(_)) => Err(err),
                    _ => Err(TransferError::SimulationFailed(err.to_string()).into()),
                }
            }
        };
        tic_ensure!(
            gas.gas_used > 0,
            TransferError::SimulationFailed("zero gas used".to_string())
        );

        let limit = gas_limit(gas.gas_used, self.policy.gas_multiplier)?;
        let price = gas_price(&chain.fee_token);
        let amount = calculate_fee(limit, price)?;
        log::debug!(
            "{} {} simulated {} gas, limit {} at {} -> {}{}",
            chain.chain_id,
            intent.kind(),
            gas.gas_used,
            limit,
            price,
            amount,
            chain.fee_token.denom
        );

        Ok(FeeEstimate {
            gas_limit: Some(limit),
            amount,
            denom: chain.fee_token.denom.clone(),
        })
    }
}
