use async_trait::async_trait;
use prost::Message;
use tic_common::{sha256, FeeEstimate, ToHex, TransferError, TransferIntent};
use tic_constants::ChainContext;
use tic_keystore::{Address, HashSigner, Result};

use crate::address::AtomAddress;
use crate::message::intent_to_any;
use crate::proto::{
    mode_info, Any, AuthInfo, Coin, Fee, ModeInfo, PubKey, SignDoc, SignerInfo, TxBody, TxRaw,
    SECP256K1_PUBKEY_TYPE_URL, SIGN_MODE_DIRECT,
};
use crate::rpc::{CosmosWalletSigner, DirectSignResponse};

const SIG_LEN: usize = 64;

/// What the wallet signed plus the base64 signature, ready to be assembled
/// into a `TxRaw` by the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmosSignedResult {
    pub body_bytes: Vec<u8>,
    pub auth_info_bytes: Vec<u8>,
    pub signature: String,
}

impl CosmosSignedResult {
    pub fn body_hex(&self) -> String {
        self.body_bytes.to_hex()
    }

    pub fn auth_info_hex(&self) -> String {
        self.auth_info_bytes.to_hex()
    }

    pub fn tx_bytes(&self) -> Result<Vec<u8>> {
        let signature = base64::decode(&self.signature)?;
        Ok(TxRaw {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            signatures: vec![signature],
        }
        .encode_to_vec())
    }
}

pub fn build_tx_body(intent: &TransferIntent, memo: &str) -> Result<TxBody> {
    Ok(TxBody {
        messages: vec![intent_to_any(intent)?],
        memo: memo.to_string(),
        timeout_height: 0,
    })
}

pub fn build_auth_info(public_key: &[u8], sequence: u64, fee: &FeeEstimate) -> Result<AuthInfo> {
    tic_ensure!(public_key.len() == 33, tic_keystore::Error::InvalidPublicKey);
    let gas_limit = fee
        .gas_limit
        .ok_or_else(|| TransferError::SimulationFailed("missing gas limit".to_string()))?;

    let public_key = Any {
        type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
        value: PubKey {
            key: public_key.to_vec(),
        }
        .encode_to_vec(),
    };
    Ok(AuthInfo {
        signer_infos: vec![SignerInfo {
            public_key: Some(public_key),
            mode_info: Some(ModeInfo {
                sum: Some(mode_info::Sum::Single(mode_info::Single {
                    mode: SIGN_MODE_DIRECT,
                })),
            }),
            sequence,
        }],
        fee: Some(Fee {
            amount: vec![Coin {
                denom: fee.denom.clone(),
                amount: fee.amount.to_string(),
            }],
            gas_limit,
            payer: String::new(),
            granter: String::new(),
        }),
    })
}

/// Direct-mode sign doc for a single-message transfer.
pub fn build_sign_doc(
    chain: &ChainContext,
    intent: &TransferIntent,
    memo: &str,
    fee: &FeeEstimate,
    public_key: &[u8],
    account_number: u64,
    sequence: u64,
) -> Result<SignDoc> {
    let body = build_tx_body(intent, memo)?;
    let auth_info = build_auth_info(public_key, sequence, fee)?;
    Ok(SignDoc {
        body_bytes: body.encode_to_vec(),
        auth_info_bytes: auth_info.encode_to_vec(),
        chain_id: chain.chain_id.clone(),
        account_number,
    })
}

/// Hands `sign_doc` to the wallet and keeps the bytes it actually signed.
pub async fn sign_with(
    signer: &dyn CosmosWalletSigner,
    address: &str,
    sign_doc: SignDoc,
) -> Result<CosmosSignedResult> {
    let DirectSignResponse { signed, signature } = signer.sign_direct(address, sign_doc).await?;
    Ok(CosmosSignedResult {
        body_bytes: signed.body_bytes,
        auth_info_bytes: signed.auth_info_bytes,
        signature,
    })
}

/// Wallet backed by an in-process secp256k1 key, signing sha256 of the
/// encoded sign doc.
pub struct LocalCosmosWalletSigner<S: HashSigner> {
    signer: S,
    address: String,
}

impl<S: HashSigner> LocalCosmosWalletSigner<S> {
    pub fn new(signer: S, chain: &ChainContext) -> Result<Self> {
        let address = AtomAddress::from_public_key(&signer.public_key(), chain)?.to_string();
        Ok(LocalCosmosWalletSigner { signer, address })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl<S: HashSigner> CosmosWalletSigner for LocalCosmosWalletSigner<S> {
    async fn sign_direct(&self, address: &str, sign_doc: SignDoc) -> Result<DirectSignResponse> {
        tic_ensure!(address == self.address, TransferError::InvalidAddress);
        let hash = sha256(&sign_doc.encode_to_vec());
        let signature = self.signer.sign_hash(&hash)?;
        tic_ensure!(signature.len() >= SIG_LEN, tic_keystore::Error::InvalidPrivateKey);
        Ok(DirectSignResponse {
            signed: sign_doc,
            signature: base64::encode(&signature[..SIG_LEN]),
        })
    }

    async fn public_key(&self, address: &str) -> Result<Vec<u8>> {
        tic_ensure!(address == self.address, TransferError::InvalidAddress);
        Ok(self.signer.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tic_common::{transfer_error, NativeSend};
    use tic_constants::{
        ChainRegistry, TEST_COSMOS_ADDRESS, TEST_PRIVATE_KEY, TEST_PRIVATE_KEY_COSMOS_ADDRESS,
        TEST_PRIVATE_KEY_PUBLIC,
    };
    use tic_keystore::LocalSecp256k1Signer;

    fn intent() -> TransferIntent {
        TransferIntent::NativeSend(NativeSend {
            from: TEST_PRIVATE_KEY_COSMOS_ADDRESS.to_string(),
            to: TEST_COSMOS_ADDRESS.to_string(),
            amount: 1000,
            denom: "uatom".to_string(),
        })
    }

    fn fee() -> FeeEstimate {
        FeeEstimate {
            gas_limit: Some(150_000),
            amount: 3750,
            denom: "uatom".to_string(),
        }
    }

    #[test]
    fn test_sign_doc_layout() {
        let hub = ChainRegistry::default().lookup("cosmoshub").unwrap();
        let public_key = hex::decode(TEST_PRIVATE_KEY_PUBLIC).unwrap();
        let sign_doc = build_sign_doc(&hub, &intent(), "memo", &fee(), &public_key, 12, 5).unwrap();
        assert_eq!(sign_doc.chain_id, "cosmoshub-4");
        assert_eq!(sign_doc.account_number, 12);

        let body = TxBody::decode(sign_doc.body_bytes.as_slice()).unwrap();
        assert_eq!(body.memo, "memo");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].type_url, crate::proto::MSG_SEND_TYPE_URL);

        let auth_info = AuthInfo::decode(sign_doc.auth_info_bytes.as_slice()).unwrap();
        let signer_info = &auth_info.signer_infos[0];
        assert_eq!(signer_info.sequence, 5);
        let pubkey_any = signer_info.public_key.as_ref().unwrap();
        assert_eq!(pubkey_any.type_url, SECP256K1_PUBKEY_TYPE_URL);
        assert_eq!(
            PubKey::decode(pubkey_any.value.as_slice()).unwrap().key,
            public_key
        );
        let fee = auth_info.fee.unwrap();
        assert_eq!(fee.gas_limit, 150_000);
        assert_eq!(fee.amount[0].amount, "3750");
    }

    #[test]
    fn test_auth_info_requires_gas_limit() {
        let public_key = hex::decode(TEST_PRIVATE_KEY_PUBLIC).unwrap();
        let mut fee = fee();
        fee.gas_limit = None;
        assert!(build_auth_info(&public_key, 0, &fee).is_err());
        assert!(build_auth_info(&public_key[1..], 0, &self::fee()).is_err());
    }

    #[tokio::test]
    async fn test_local_wallet_signs_sign_doc() {
        let hub = ChainRegistry::default().lookup("cosmoshub").unwrap();
        let wallet =
            LocalCosmosWalletSigner::new(LocalSecp256k1Signer::from_hex(TEST_PRIVATE_KEY).unwrap(), &hub)
                .unwrap();
        assert_eq!(wallet.address(), TEST_PRIVATE_KEY_COSMOS_ADDRESS);

        let public_key = wallet.public_key(TEST_PRIVATE_KEY_COSMOS_ADDRESS).await.unwrap();
        let sign_doc = build_sign_doc(&hub, &intent(), "", &fee(), &public_key, 1, 0).unwrap();
        let expected = LocalSecp256k1Signer::from_hex(TEST_PRIVATE_KEY)
            .unwrap()
            .sign_hash(&sha256(&sign_doc.encode_to_vec()))
            .unwrap();

        let signed = sign_with(&wallet, TEST_PRIVATE_KEY_COSMOS_ADDRESS, sign_doc.clone())
            .await
            .unwrap();
        assert_eq!(signed.body_bytes, sign_doc.body_bytes);
        assert_eq!(signed.auth_info_bytes, sign_doc.auth_info_bytes);
        assert_eq!(base64::decode(&signed.signature).unwrap(), expected);

        let raw = TxRaw::decode(signed.tx_bytes().unwrap().as_slice()).unwrap();
        assert_eq!(raw.signatures, vec![expected]);
    }

    #[tokio::test]
    async fn test_local_wallet_rejects_other_address() {
        let hub = ChainRegistry::default().lookup("cosmoshub").unwrap();
        let wallet =
            LocalCosmosWalletSigner::new(LocalSecp256k1Signer::from_hex(TEST_PRIVATE_KEY).unwrap(), &hub)
                .unwrap();
        let err = wallet
            .sign_direct(TEST_COSMOS_ADDRESS, SignDoc::default())
            .await
            .unwrap_err();
        assert_eq!(transfer_error(&err), Some(&TransferError::InvalidAddress));
    }
}
