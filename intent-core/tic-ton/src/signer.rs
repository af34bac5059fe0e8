use tic_common::{ToHex, TransferError, TransferIntent};
use tic_constants::CurveType;
use tic_keystore::{HashSigner, Result};
use tonlib_core::cell::{BagOfCells, Cell};

use crate::message::{external_message, intent_to_out_message, signed_body, WalletTransfer};
use crate::wallet::TonWallet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TonSignedResult {
    /// base64 BOC of the external message, ready for `sendBoc`
    pub boc: String,
    pub message_hash: String,
    pub signature: String,
}

/// Wallet body fields for `intent`, everything but the signature.
pub fn wallet_transfer(
    wallet: &TonWallet,
    intent: &TransferIntent,
    seqno: u32,
    valid_until: u32,
) -> Result<WalletTransfer> {
    let (send_mode, message) = intent_to_out_message(intent)?;
    Ok(WalletTransfer {
        version: wallet.version,
        wallet_id: wallet.wallet_id,
        seqno,
        valid_until,
        send_mode,
        message,
    })
}

/// External message carrying `signature`, with the wallet's `StateInit`
/// while it is not deployed.
pub fn assemble(
    wallet: &TonWallet,
    transfer: &WalletTransfer,
    signature: &[u8],
    deployed: bool,
) -> Result<Cell> {
    let body = signed_body(wallet.version, &transfer.signing_message()?, signature)?;
    let state_init = if deployed {
        None
    } else {
        Some(wallet.state_init()?)
    };
    external_message(&wallet.address, state_init.as_ref(), &body)
}

/// Signs the representation hash of the signing message with the wallet key.
pub fn sign_transfer(
    wallet: &TonWallet,
    transfer: &WalletTransfer,
    deployed: bool,
    signer: &dyn HashSigner,
) -> Result<TonSignedResult> {
    tic_ensure!(
        signer.curve() == CurveType::ED25519 && signer.public_key() == wallet.public_key,
        TransferError::InvalidAddress
    );
    let signing_message = transfer.signing_message()?;
    let signature = signer.sign_hash(&signing_message.cell_hash())?;
    let external = assemble(wallet, transfer, &signature, deployed)?;
    let boc = BagOfCells::from_root(external.clone()).to_base64()?;
    Ok(TonSignedResult {
        boc,
        message_hash: external.cell_hash().to_hex(),
        signature: signature.to_hex(),
    })
}
