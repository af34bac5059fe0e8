use tic_common::{
    parse_units, JettonTransfer, TonNativeTransfer, TransferError, TransferIntent, TransferRequest,
};
use tic_constants::TransferPolicy;
use tic_keystore::Result;

use crate::address::{bounce_for, parse_address};
use crate::jetton::resolve_jetton_wallet;
use crate::rpc::TonRpc;
use crate::wallet::TonWallet;

/// TON and the configured jetton both use 9 decimals.
pub const TON_DECIMALS: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonClassification {
    Jetton,
    Native,
}

/// The configured jetton symbol selects a jetton transfer, anything else
/// moves TON.
pub fn classify(request: &TransferRequest, policy: &TransferPolicy) -> TonClassification {
    if request.denom_or_token.trim() == policy.jetton_symbol {
        TonClassification::Jetton
    } else {
        TonClassification::Native
    }
}

pub struct TonIntentBuilder<'a> {
    policy: &'a TransferPolicy,
}

impl<'a> TonIntentBuilder<'a> {
    pub fn new(policy: &'a TransferPolicy) -> Self {
        TonIntentBuilder { policy }
    }

    pub async fn build(
        &self,
        request: &TransferRequest,
        wallet: &TonWallet,
        rpc: &dyn TonRpc,
    ) -> Result<TransferIntent> {
        self.build_with_mode(request, wallet, self.policy.default_send_mode, rpc)
            .await
    }

    /// Same as `build` with an explicit send mode, e.g.
    /// `SEND_MODE_CARRY_ALL_REMAINING_BALANCE` to sweep the wallet.
    pub async fn build_with_mode(
        &self,
        request: &TransferRequest,
        wallet: &TonWallet,
        send_mode: u8,
        rpc: &dyn TonRpc,
    ) -> Result<TransferIntent> {
        let (source, _) = parse_address(&request.source_address)?;
        tic_ensure!(source == wallet.address, TransferError::InvalidAddress);
        parse_address(&request.recipient)?;

        let amount = parse_units(&request.amount, TON_DECIMALS)?;
        tic_ensure!(amount > 0, TransferError::InvalidAmount);

        let classification = classify(request, self.policy);
        log::debug!(
            "classified transfer from {} as {:?}",
            request.source_address,
            classification
        );

        match classification {
            TonClassification::Jetton => {
                let (master, _) = parse_address(&self.policy.jetton_master)?;
                let jetton_wallet = resolve_jetton_wallet(&master, &wallet.address, rpc).await?;
                let response_address = wallet.friendly_address();
                Ok(TransferIntent::JettonTransfer(JettonTransfer {
                    jetton_master_address: self.policy.jetton_master.clone(),
                    jetton_wallet_address: jetton_wallet.to_base64_url_flags(false, wallet.testnet),
                    to: request.recipient.trim().to_string(),
                    amount_nano: amount,
                    forward_amount_nano: 0,
                    response_address,
                    attached_value_nano: self.policy.jetton_attached_value,
                    query_id: 0,
                    send_mode,
                }))
            }
            TonClassification::Native => {
                let memo = request.memo.trim();
                Ok(TransferIntent::TonNativeTransfer(TonNativeTransfer {
                    to: request.recipient.trim().to_string(),
                    value_nano: amount,
                    comment: if memo.is_empty() {
                        None
                    } else {
                        Some(memo.to_string())
                    },
                    bounce: bounce_for(&request.recipient)?,
                    send_mode,
                }))
            }
        }
    }
}
