use serde::{Deserialize, Serialize};

/// User input for one transfer, before it is mapped to a concrete message.
///
/// Cosmos amounts are integer strings in the smallest unit. TON amounts are
/// decimal strings in whole TON or whole jettons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub source_address: String,
    pub recipient: String,
    pub amount: String,
    pub denom_or_token: String,
    #[serde(default)]
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeSend {
    pub from: String,
    pub to: String,
    pub amount: u128,
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IbcTransfer {
    pub source_port: String,
    pub source_channel: String,
    pub sender: String,
    pub receiver: String,
    pub token: Coin,
    pub memo: String,
    pub timeout_timestamp_nanos: u64,
}

/// CW20 `transfer` executed on `contract_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractExecuteTransfer {
    pub sender: String,
    pub contract_address: String,
    pub recipient: String,
    pub amount: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TonNativeTransfer {
    pub to: String,
    pub value_nano: u128,
    pub comment: Option<String>,
    pub bounce: bool,
    pub send_mode: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JettonTransfer {
    pub jetton_master_address: String,
    pub jetton_wallet_address: String,
    pub to: String,
    pub amount_nano: u128,
    pub forward_amount_nano: u128,
    pub response_address: String,
    pub attached_value_nano: u128,
    pub query_id: u64,
    pub send_mode: u8,
}

/// The one message shape a request maps to. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransferIntent {
    NativeSend(NativeSend),
    IbcTransfer(IbcTransfer),
    ContractExecuteTransfer(ContractExecuteTransfer),
    TonNativeTransfer(TonNativeTransfer),
    JettonTransfer(JettonTransfer),
}

impl TransferIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            TransferIntent::NativeSend(_) => "native_send",
            TransferIntent::IbcTransfer(_) => "ibc_transfer",
            TransferIntent::ContractExecuteTransfer(_) => "contract_execute_transfer",
            TransferIntent::TonNativeTransfer(_) => "ton_native_transfer",
            TransferIntent::JettonTransfer(_) => "jetton_transfer",
        }
    }
}

/// Cosmos fees carry a gas limit, TON fees do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub gas_limit: Option<u64>,
    pub amount: u128,
    pub denom: String,
}
