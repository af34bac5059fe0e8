use tic_common::{
    parse_integer_amount, transfer_error, Clock, Coin, ContractExecuteTransfer, IbcTransfer,
    NativeSend, TransferError, TransferIntent, TransferRequest,
};
use tic_constants::{ChainContext, ChainRegistry, TransferPolicy};
use tic_keystore::Result;

use crate::address;
use crate::rpc::CosmosRpc;

pub const CW20_PREFIX: &str = "cw20:";
pub const IBC_TRANSFER_PORT: &str = "transfer";

/// Message shape chosen for a request before any network lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Recipient lives on the chain using `recipient_prefix`.
    Ibc { recipient_prefix: String },
    Cw20 { contract_address: String },
    Native,
}

/// Maps a request to a message shape. IBC wins over CW20 which wins over a
/// plain bank send.
pub fn classify(request: &TransferRequest, source: &ChainContext) -> Result<Classification> {
    let (source_prefix, _) = address::decode(&request.source_address)?;
    tic_ensure!(
        source_prefix == source.bech32_prefix,
        TransferError::InvalidAddress
    );

    let (recipient_prefix, recipient_data) = address::decode(&request.recipient)
        .map_err(|_| TransferError::InvalidRecipientChain)?;
    tic_ensure!(
        recipient_data.len() == address::LENGTH || recipient_data.len() == address::CONTRACT_LENGTH,
        TransferError::InvalidAddress
    );

    let denom = request.denom_or_token.trim();
    let cw20_contract = denom.strip_prefix(CW20_PREFIX);

    if recipient_prefix != source.bech32_prefix {
        // CW20 balances never leave their chain through ICS-20
        tic_ensure!(cw20_contract.is_none(), TransferError::UnsupportedAsset);
        tic_ensure!(is_valid_denom(denom), TransferError::UnsupportedAsset);
        return Ok(Classification::Ibc { recipient_prefix });
    }

    if let Some(contract) = cw20_contract {
        // remainder passes through unchanged
        tic_ensure!(!contract.is_empty(), TransferError::UnsupportedAsset);
        return Ok(Classification::Cw20 {
            contract_address: contract.to_string(),
        });
    }

    tic_ensure!(is_valid_denom(denom), TransferError::UnsupportedAsset);
    Ok(Classification::Native)
}

/// Cosmos SDK denom rule: `[a-zA-Z][a-zA-Z0-9/:._-]{2,127}`.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    if bytes.len() < 3 || bytes.len() > 128 || !bytes[0].is_ascii_alphabetic() {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || b"/:._-".contains(b))
}

/// Turns a classified request into an immutable intent, looking up the
/// recipient chain and the IBC channel when needed.
pub struct CosmosIntentBuilder<'a> {
    registry: &'a ChainRegistry,
    policy: &'a TransferPolicy,
    clock: &'a dyn Clock,
}

impl<'a> CosmosIntentBuilder<'a> {
    pub fn new(
        registry: &'a ChainRegistry,
        policy: &'a TransferPolicy,
        clock: &'a dyn Clock,
    ) -> Self {
        CosmosIntentBuilder {
            registry,
            policy,
            clock,
        }
    }

    pub async fn build(
        &self,
        request: &TransferRequest,
        source: &ChainContext,
        rpc: &dyn CosmosRpc,
    ) -> Result<TransferIntent> {
        let classification = classify(request, source)?;
        log::debug!(
            "classified transfer from {} on {} as {:?}",
            request.source_address,
            source.chain_name,
            classification
        );
        self.resolve(classification, request, source, rpc).await
    }

    pub async fn resolve(
        &self,
        classification: Classification,
        request: &TransferRequest,
        source: &ChainContext,
        rpc: &dyn CosmosRpc,
    ) -> Result<TransferIntent> {
        let amount = parse_integer_amount(&request.amount)?;
        tic_ensure!(amount > 0, TransferError::InvalidAmount);

        match classification {
            Classification::Ibc { recipient_prefix } => {
                let dest = self
                    .registry
                    .lookup_by_prefix(&recipient_prefix)
                    .ok_or(TransferError::InvalidRecipientChain)?;
                let source_channel = self.resolve_channel(source, &dest, rpc).await?;
                let timeout_timestamp_nanos = self
                    .clock
                    .now_secs()
                    .checked_add(self.policy.ibc_timeout_secs)
                    .and_then(|secs| secs.checked_mul(1_000_000_000))
                    .ok_or_else(|| {
                        TransferError::InvalidPolicy(format!(
                            "ibc timeout of {}s overflows",
                            self.policy.ibc_timeout_secs
                        ))
                    })?;

                Ok(TransferIntent::IbcTransfer(IbcTransfer {
                    source_port: IBC_TRANSFER_PORT.to_string(),
                    source_channel,
                    sender: request.source_address.clone(),
                    receiver: request.recipient.clone(),
                    token: Coin {
                        denom: request.denom_or_token.trim().to_string(),
                        amount: amount.to_string(),
                    },
                    memo: request.memo.clone(),
                    timeout_timestamp_nanos,
                }))
            }
            Classification::Cw20 { contract_address } => {
                Ok(TransferIntent::ContractExecuteTransfer(ContractExecuteTransfer {
                    sender: request.source_address.clone(),
                    contract_address,
                    recipient: request.recipient.clone(),
                    amount,
                }))
            }
            Classification::Native => Ok(TransferIntent::NativeSend(NativeSend {
                from: request.source_address.clone(),
                to: request.recipient.clone(),
                amount,
                denom: request.denom_or_token.trim().to_string(),
            })),
        }
    }

    async fn resolve_channel(
        &self,
        source: &ChainContext,
        dest: &ChainContext,
        rpc: &dyn CosmosRpc,
    ) -> Result<String> {
        match rpc
            .get_source_channel_id(&source.chain_id, &dest.chain_id)
            .await
        {
            Ok(Some(channel)) => {
                log::debug!(
                    "resolved {} for {} -> {}",
                    channel,
                    source.chain_id,
                    dest.chain_id
                );
                Ok(channel)
            }
            Ok(None) => Err(TransferError::ChannelNotFound.into()),
            Err(err) => match transfer_error(&err) {
                Some(TransferError::RpcUnavailable(_)) => Err(err),
                _ => {
                    log::warn!(
                        "channel lookup {} -> {} failed: {}",
                        source.chain_id,
                        dest.chain_id,
                        err
                    );
                    Err(TransferError::ChannelNotFound.into())
                }
            },
        }
    }
}
