//! Internal and external messages of the TON wallet contracts.
use tic_common::{TransferError, TransferIntent};
use tic_keystore::Result;
use tonlib_core::cell::{ArcCell, Cell, CellBuilder};
use tonlib_core::types::TonAddress as TonAddressLib;
use tonlib_core::wallet::WalletVersion;

use crate::address::parse_address;
use crate::jetton::{jetton_transfer_body, JettonTransferBody};

pub const SEND_MODE_PAY_GAS_SEPARATELY: u8 = 1;
pub const SEND_MODE_IGNORE_ERRORS: u8 = 2;
pub const SEND_MODE_CARRY_ALL_REMAINING_BALANCE: u8 = 128;

pub const SIGNATURE_LEN: usize = 64;

const COMMENT_OP: u32 = 0;
const V5R1_AUTH_SIGNED_EXTERNAL: u32 = 0x7369676e;
const V5R1_ACTION_SEND_MSG: u32 = 0x0ec3c86d;
/// `valid_until` of the deploying message, which has no expiry.
const NO_EXPIRY: u32 = u32::MAX;

/// Text comment body: a zero op code followed by the UTF-8 bytes, continued
/// in a chain of references once a cell is full.
pub fn comment_body(comment: &str) -> Result<ArcCell> {
    let bytes = comment.as_bytes();
    let head_len = bytes.len().min(CellBuilder::new().remaining_bits() / 8 - 4);
    let (head, rest) = bytes.split_at(head_len);

    let mut tail: Option<ArcCell> = None;
    for chunk in rest.chunks(127).rev() {
        let mut builder = CellBuilder::new();
        builder.store_slice(chunk)?;
        if let Some(next) = tail.as_ref() {
            builder.store_reference(next)?;
        }
        tail = Some(builder.build()?.to_arc());
    }

    let mut builder = CellBuilder::new();
    builder.store_u32(32, COMMENT_OP)?.store_slice(head)?;
    if let Some(next) = tail.as_ref() {
        builder.store_reference(next)?;
    }
    Ok(builder.build()?.to_arc())
}

/// `MessageRelaxed` with `int_msg_info`: no source, no state init.
pub fn internal_message(
    to: &TonAddressLib,
    value: u128,
    bounce: bool,
    body: Option<&ArcCell>,
) -> Result<ArcCell> {
    let mut builder = CellBuilder::new();
    builder
        .store_bit(false)? // int_msg_info$0
        .store_bit(true)? // ihr_disabled
        .store_bit(bounce)?
        .store_bit(false)? // bounced
        .store_null_address()?
        .store_address(to)?
        .store_coins(value)?
        .store_bit(false)? // extra currencies
        .store_coins(0)? // ihr_fee
        .store_coins(0)? // fwd_fee
        .store_u64(64, 0)? // created_lt
        .store_u32(32, 0)? // created_at
        .store_bit(false)?; // init
    match body {
        Some(body) => builder.store_either_cell(body)?,
        None => builder.store_bit(false)?,
    };
    Ok(builder.build()?.to_arc())
}

/// The single outgoing message an intent turns into, with its send mode.
pub fn intent_to_out_message(intent: &TransferIntent) -> Result<(u8, ArcCell)> {
    match intent {
        TransferIntent::TonNativeTransfer(transfer) => {
            let (to, _) = parse_address(&transfer.to)?;
            let body = match transfer.comment.as_deref() {
                Some(comment) if !comment.is_empty() => Some(comment_body(comment)?),
                _ => None,
            };
            let message =
                internal_message(&to, transfer.value_nano, transfer.bounce, body.as_ref())?;
            Ok((transfer.send_mode, message))
        }
        TransferIntent::JettonTransfer(transfer) => {
            let (jetton_wallet, _) = parse_address(&transfer.jetton_wallet_address)?;
            let (destination, _) = parse_address(&transfer.to)?;
            let (response_destination, _) = parse_address(&transfer.response_address)?;
            let body = jetton_transfer_body(&JettonTransferBody {
                query_id: transfer.query_id,
                amount: transfer.amount_nano,
                destination,
                response_destination,
                forward_ton_amount: transfer.forward_amount_nano,
            })?;
            let message = internal_message(
                &jetton_wallet,
                transfer.attached_value_nano,
                true,
                Some(&body),
            )?;
            Ok((transfer.send_mode, message))
        }
        _ => Err(TransferError::UnsupportedAsset.into()),
    }
}

/// Fields of the wallet body that the signature covers.
#[derive(Debug, Clone)]
pub struct WalletTransfer {
    pub version: WalletVersion,
    pub wallet_id: i32,
    pub seqno: u32,
    pub valid_until: u32,
    pub send_mode: u8,
    pub message: ArcCell,
}

impl WalletTransfer {
    /// The first message of a wallet never expires.
    pub fn expiry(seqno: u32, now_secs: u64, ttl_secs: u64) -> u32 {
        if seqno == 0 {
            NO_EXPIRY
        } else {
            u32::try_from(now_secs.saturating_add(ttl_secs)).unwrap_or(NO_EXPIRY)
        }
    }

    pub fn signing_message(&self) -> Result<Cell> {
        let mut builder = CellBuilder::new();
        match self.version {
            WalletVersion::V3R2 | WalletVersion::V4R2 => {
                builder
                    .store_i32(32, self.wallet_id)?
                    .store_u32(32, self.valid_until)?
                    .store_u32(32, self.seqno)?;
                if self.version == WalletVersion::V4R2 {
                    // simple send op
                    builder.store_u8(8, 0)?;
                }
                builder
                    .store_u8(8, self.send_mode)?
                    .store_reference(&self.message)?;
            }
            WalletVersion::V5R1 => {
                let empty = CellBuilder::new().build()?.to_arc();
                let out_list = CellBuilder::new()
                    .store_reference(&empty)?
                    .store_u32(32, V5R1_ACTION_SEND_MSG)?
                    .store_u8(8, self.send_mode)?
                    .store_reference(&self.message)?
                    .build()?
                    .to_arc();
                builder
                    .store_u32(32, V5R1_AUTH_SIGNED_EXTERNAL)?
                    .store_i32(32, self.wallet_id)?
                    .store_u32(32, self.valid_until)?
                    .store_u32(32, self.seqno)?
                    .store_maybe_reference(Some(&out_list))?
                    // no extended actions
                    .store_bit(false)?;
            }
        }
        Ok(builder.build()?)
    }
}

/// Attaches `signature` where the wallet version expects it: in front of the
/// signed fields for V3/V4, behind them for V5.
pub fn signed_body(version: WalletVersion, signing_message: &Cell, signature: &[u8]) -> Result<ArcCell> {
    tic_ensure!(
        signature.len() == SIGNATURE_LEN,
        tic_keystore::Error::InvalidHashLength
    );
    let mut builder = CellBuilder::new();
    match version {
        WalletVersion::V3R2 | WalletVersion::V4R2 => {
            builder.store_slice(signature)?.store_cell(signing_message)?;
        }
        WalletVersion::V5R1 => {
            builder.store_cell(signing_message)?.store_slice(signature)?;
        }
    }
    Ok(builder.build()?.to_arc())
}

/// `Message` with `ext_in_msg_info` addressed to the wallet itself.
pub fn external_message(
    wallet: &TonAddressLib,
    state_init: Option<&ArcCell>,
    body: &ArcCell,
) -> Result<Cell> {
    let mut builder = CellBuilder::new();
    builder
        .store_u8(2, 0b10)? // ext_in_msg_info$10
        .store_null_address()?
        .store_address(wallet)?
        .store_coins(0)?; // import_fee
    match state_init {
        Some(state_init) => {
            builder.store_bit(true)?;
            let inline = builder.remaining_bits() >= 2 + state_init.bit_len() + body.bit_len();
            if inline {
                builder.store_bit(false)?.store_cell(state_init)?;
            } else {
                builder.store_bit(true)?.store_reference(state_init)?;
            }
        }
        None => {
            builder.store_bit(false)?;
        }
    }
    builder.store_either_cell(body)?;
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tic_common::{JettonTransfer, NativeSend, TonNativeTransfer};
    use tic_constants::TEST_TON_ADDRESS;

    fn recipient() -> TonAddressLib {
        parse_address(TEST_TON_ADDRESS).unwrap().0
    }

    #[test]
    fn test_comment_body() {
        let body = comment_body("test").unwrap();
        assert_eq!(body.bit_len(), 64);
        assert_eq!(body.data(), &[0, 0, 0, 0, b't', b'e', b's', b't']);

        let long = "x".repeat(300);
        let body = comment_body(&long).unwrap();
        assert_eq!(body.bit_len(), 32 + 123 * 8);
        let second = &body.references()[0];
        assert_eq!(second.bit_len(), 127 * 8);
        assert_eq!(second.references()[0].bit_len(), 50 * 8);
    }

    #[test]
    fn test_internal_message_layout() {
        let message = internal_message(&recipient(), 10_000_000, false, None).unwrap();
        let mut parser = message.parser();
        assert!(!parser.load_bit().unwrap());
        assert!(parser.load_bit().unwrap());
        assert!(!parser.load_bit().unwrap());
        assert!(!parser.load_bit().unwrap());
        assert_eq!(parser.load_address().unwrap(), None);
        assert_eq!(parser.load_address().unwrap(), Some(recipient()));
        assert_eq!(parser.load_coins().unwrap(), 10_000_000);
        assert!(!parser.load_bit().unwrap());
        assert_eq!(parser.load_coins().unwrap(), 0);
        assert_eq!(parser.load_coins().unwrap(), 0);
        assert_eq!(parser.load_u64(64).unwrap(), 0);
        assert_eq!(parser.load_u32(32).unwrap(), 0);
        assert!(!parser.load_bit().unwrap());
        assert!(!parser.load_bit().unwrap());
        parser.ensure_empty().unwrap();
    }

    #[test]
    fn test_native_out_message_carries_comment() {
        let intent = TransferIntent::TonNativeTransfer(TonNativeTransfer {
            to: TEST_TON_ADDRESS.to_string(),
            value_nano: 1,
            comment: Some("test".to_string()),
            bounce: true,
            send_mode: 3,
        });
        let (mode, message) = intent_to_out_message(&intent).unwrap();
        assert_eq!(mode, 3);
        // header bits then an inline comment
        assert!(message.references().is_empty());
        assert_eq!(message.bit_len(), 4 + 2 + 267 + 12 + 1 + 4 + 4 + 64 + 32 + 1 + 1 + 64);
    }

    #[test]
    fn test_jetton_out_message_targets_jetton_wallet() {
        let jetton_wallet = "EQCKJfmBlnFiINcL1MoCjuyxULXaOEA-k5iHcr4L18RuhQHo";
        let intent = TransferIntent::JettonTransfer(JettonTransfer {
            jetton_master_address: "kQAiboDEv_qRrcEdrYdwbVLNOXBHwShFbtKGbQVJ2OKxY_Di".to_string(),
            jetton_wallet_address: jetton_wallet.to_string(),
            to: TEST_TON_ADDRESS.to_string(),
            amount_nano: 10_000_000,
            forward_amount_nano: 0,
            response_address: TEST_TON_ADDRESS.to_string(),
            attached_value_nano: 50_000_000,
            query_id: 0,
            send_mode: 3,
        });
        let (_, message) = intent_to_out_message(&intent).unwrap();
        let mut parser = message.parser();
        parser.skip_bits(4).unwrap();
        assert_eq!(parser.load_address().unwrap(), None);
        assert_eq!(
            parser.load_address().unwrap(),
            Some(parse_address(jetton_wallet).unwrap().0)
        );
        assert_eq!(parser.load_coins().unwrap(), 50_000_000);
    }

    #[test]
    fn test_cosmos_intent_has_no_out_message() {
        let intent = TransferIntent::NativeSend(NativeSend {
            from: "a".to_string(),
            to: "b".to_string(),
            amount: 1,
            denom: "uatom".to_string(),
        });
        assert!(intent_to_out_message(&intent).is_err());
    }

    fn transfer(version: WalletVersion, seqno: u32) -> WalletTransfer {
        WalletTransfer {
            version,
            wallet_id: version.default_wallet_id(),
            seqno,
            valid_until: WalletTransfer::expiry(seqno, 1_700_000_000, 600),
            send_mode: 3,
            message: internal_message(&recipient(), 1, false, None).unwrap(),
        }
    }

    #[test]
    fn test_expiry() {
        assert_eq!(WalletTransfer::expiry(0, 1_700_000_000, 600), u32::MAX);
        assert_eq!(WalletTransfer::expiry(4, 1_700_000_000, 600), 1_700_000_600);
    }

    #[test]
    fn test_v4_signing_message() {
        let cell = transfer(WalletVersion::V4R2, 4).signing_message().unwrap();
        assert_eq!(cell.bit_len(), 32 * 3 + 8 + 8);
        let mut parser = cell.parser();
        assert_eq!(parser.load_i32(32).unwrap(), 0x29a9a317);
        assert_eq!(parser.load_u32(32).unwrap(), 1_700_000_600);
        assert_eq!(parser.load_u32(32).unwrap(), 4);
        assert_eq!(parser.load_u8(8).unwrap(), 0);
        assert_eq!(parser.load_u8(8).unwrap(), 3);
        assert_eq!(cell.references().len(), 1);
    }

    #[test]
    fn test_v5_signing_message() {
        let transfer = transfer(WalletVersion::V5R1, 0);
        let cell = transfer.signing_message().unwrap();
        let mut parser = cell.parser();
        assert_eq!(parser.load_u32(32).unwrap(), V5R1_AUTH_SIGNED_EXTERNAL);
        assert_eq!(parser.load_i32(32).unwrap(), 0x7FFFFF11);
        assert_eq!(parser.load_u32(32).unwrap(), u32::MAX);
        assert_eq!(parser.load_u32(32).unwrap(), 0);
        assert!(parser.load_bit().unwrap());
        assert!(!parser.load_bit().unwrap());
        assert_eq!(parser.remaining_bits(), 0);

        let out_list = &cell.references()[0];
        let mut parser = out_list.parser();
        assert_eq!(parser.load_u32(32).unwrap(), V5R1_ACTION_SEND_MSG);
        assert_eq!(parser.load_u8(8).unwrap(), 3);
        assert_eq!(out_list.references()[0].bit_len(), 0);
        assert_eq!(
            out_list.references()[1].cell_hash(),
            transfer.message.cell_hash()
        );
    }

    #[test]
    fn test_signature_placement() {
        let signature = [0xabu8; SIGNATURE_LEN];

        let v3 = transfer(WalletVersion::V3R2, 1);
        let body = signed_body(v3.version, &v3.signing_message().unwrap(), &signature).unwrap();
        assert_eq!(&body.data()[..SIGNATURE_LEN], &signature[..]);

        let v5 = transfer(WalletVersion::V5R1, 1);
        let signing = v5.signing_message().unwrap();
        let body = signed_body(v5.version, &signing, &signature).unwrap();
        assert_eq!(body.bit_len(), signing.bit_len() + SIGNATURE_LEN * 8);
        assert_eq!(&body.data()[..4], &V5R1_AUTH_SIGNED_EXTERNAL.to_be_bytes());

        assert!(signed_body(v5.version, &signing, &signature[1..]).is_err());
    }

    #[test]
    fn test_external_message_with_state_init() {
        let key = [7u8; 32];
        let version = WalletVersion::V5R1;
        let wallet = version.address(&key, version.default_wallet_id()).unwrap();
        let state_init = version.state_init(&key, version.default_wallet_id()).unwrap();
        let transfer = transfer(version, 0);
        let body = signed_body(
            version,
            &transfer.signing_message().unwrap(),
            &[0u8; SIGNATURE_LEN],
        )
        .unwrap();

        let message = external_message(&wallet, Some(&state_init), &body).unwrap();
        let mut parser = message.parser();
        assert_eq!(parser.load_u8(2).unwrap(), 0b10);
        assert_eq!(parser.load_address().unwrap(), None);
        assert_eq!(parser.load_address().unwrap(), Some(wallet));
        assert_eq!(parser.load_coins().unwrap(), 0);
        // Maybe present, inline state init
        assert!(parser.load_bit().unwrap());
        assert!(!parser.load_bit().unwrap());

        let deployed = external_message(&wallet, None, &body).unwrap();
        assert_ne!(deployed.cell_hash(), message.cell_hash());
    }
}
