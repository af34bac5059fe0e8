use prost::Message;
use serde::Serialize;
use tic_common::{TransferError, TransferIntent};
use tic_keystore::Result;

use crate::proto::{
    Any, Coin, MsgExecuteContract, MsgSend, MsgTransfer, MSG_EXECUTE_CONTRACT_TYPE_URL,
    MSG_SEND_TYPE_URL, MSG_TRANSFER_TYPE_URL,
};

#[derive(Serialize)]
struct Cw20Transfer<'a> {
    recipient: &'a str,
    amount: String,
}

#[derive(Serialize)]
struct Cw20ExecuteMsg<'a> {
    transfer: Cw20Transfer<'a>,
}

/// `{"transfer":{"recipient":..,"amount":".."}}`, the CW20 execute payload.
pub fn cw20_transfer_msg(recipient: &str, amount: u128) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&Cw20ExecuteMsg {
        transfer: Cw20Transfer {
            recipient,
            amount: amount.to_string(),
        },
    })?)
}

/// Packs a Cosmos intent into the `Any` carried by the tx body.
pub fn intent_to_any(intent: &TransferIntent) -> Result<Any> {
    match intent {
        TransferIntent::NativeSend(send) => {
            let msg = MsgSend {
                from_address: send.from.clone(),
                to_address: send.to.clone(),
                amount: vec![Coin {
                    denom: send.denom.clone(),
                    amount: send.amount.to_string(),
                }],
            };
            Ok(Any {
                type_url: MSG_SEND_TYPE_URL.to_string(),
                value: msg.encode_to_vec(),
            })
        }
        TransferIntent::IbcTransfer(transfer) => {
            let msg = MsgTransfer {
                source_port: transfer.source_port.clone(),
                source_channel: transfer.source_channel.clone(),
                token: Some(Coin {
                    denom: transfer.token.denom.clone(),
                    amount: transfer.token.amount.clone(),
                }),
                sender: transfer.sender.clone(),
                receiver: transfer.receiver.clone(),
                timeout_height: None,
                timeout_timestamp: transfer.timeout_timestamp_nanos,
                memo: transfer.memo.clone(),
            };
            Ok(Any {
                type_url: MSG_TRANSFER_TYPE_URL.to_string(),
                value: msg.encode_to_vec(),
            })
        }
        TransferIntent::ContractExecuteTransfer(execute) => {
            let msg = MsgExecuteContract {
                sender: execute.sender.clone(),
                contract: execute.contract_address.clone(),
                msg: cw20_transfer_msg(&execute.recipient, execute.amount)?,
                funds: vec![],
            };
            Ok(Any {
                type_url: MSG_EXECUTE_CONTRACT_TYPE_URL.to_string(),
                value: msg.encode_to_vec(),
            })
        }
        TransferIntent::TonNativeTransfer(_) | TransferIntent::JettonTransfer(_) => {
            Err(TransferError::UnsupportedAsset.into())
        }
    }
}
