use ed25519_dalek::Signer as _;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use tic_common::decode_hex;
use tic_constants::CurveType;

use crate::{Error, Result};

lazy_static::lazy_static! {
    static ref SECP256K1_ENGINE: Secp256k1<secp256k1::All> = Secp256k1::new();
}

/// Signs prepared digests with a key the caller controls.
pub trait HashSigner: Send + Sync {
    fn curve(&self) -> CurveType;

    fn public_key(&self) -> Vec<u8>;

    fn sign_hash(&self, hash: &[u8]) -> Result<Vec<u8>>;
}

/// secp256k1 key producing 64 byte compact (r || s) signatures over a sha256 digest.
pub struct LocalSecp256k1Signer {
    secret_key: SecretKey,
}

impl LocalSecp256k1Signer {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(LocalSecp256k1Signer { secret_key })
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(hex)?)
    }
}

impl HashSigner for LocalSecp256k1Signer {
    fn curve(&self) -> CurveType {
        CurveType::SECP256k1
    }

    /// Compressed 33 byte encoding.
    fn public_key(&self) -> Vec<u8> {
        PublicKey::from_secret_key(&SECP256K1_ENGINE, &self.secret_key)
            .serialize()
            .to_vec()
    }

    fn sign_hash(&self, hash: &[u8]) -> Result<Vec<u8>> {
        let message = Message::from_slice(hash).map_err(|_| Error::InvalidHashLength)?;
        let signature = SECP256K1_ENGINE.sign_ecdsa(&message, &self.secret_key);
        Ok(signature.serialize_compact().to_vec())
    }
}

/// ed25519 key; TON wallets sign the 32 byte representation hash of the body cell.
pub struct LocalEd25519Signer {
    signing_key: ed25519_dalek::SigningKey,
}

impl LocalEd25519Signer {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let seed: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidPrivateKey)?;
        Ok(LocalEd25519Signer {
            signing_key: ed25519_dalek::SigningKey::from_bytes(&seed),
        })
    }

    pub fn from_hex(hex: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(hex)?)
    }
}

impl HashSigner for LocalEd25519Signer {
    fn curve(&self) -> CurveType {
        CurveType::ED25519
    }

    fn public_key(&self) -> Vec<u8> {
        self.signing_key.verifying_key().to_bytes().to_vec()
    }

    fn sign_hash(&self, hash: &[u8]) -> Result<Vec<u8>> {
        Ok(self.signing_key.sign(hash).to_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;
    use secp256k1::ecdsa::Signature;
    use tic_common::{sha256, ToHex};
    use tic_constants::{TEST_PRIVATE_KEY, TEST_PRIVATE_KEY_PUBLIC};

    #[test]
    fn test_secp256k1_sign_and_verify() {
        let signer = LocalSecp256k1Signer::from_hex(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(signer.public_key().to_hex(), TEST_PRIVATE_KEY_PUBLIC);

        let hash = sha256(b"sign doc bytes");
        let sig = signer.sign_hash(&hash).unwrap();
        assert_eq!(sig.len(), 64);

        let signature = Signature::from_compact(&sig).unwrap();
        let public_key = PublicKey::from_slice(&signer.public_key()).unwrap();
        let message = Message::from_slice(&hash).unwrap();
        assert!(SECP256K1_ENGINE
            .verify_ecdsa(&message, &signature, &public_key)
            .is_ok());

        // RFC6979 nonces make the signature deterministic
        assert_eq!(signer.sign_hash(&hash).unwrap(), sig);
    }

    #[test]
    fn test_secp256k1_rejects_bad_input() {
        assert!(LocalSecp256k1Signer::from_bytes(&[0u8; 32]).is_err());
        let signer = LocalSecp256k1Signer::from_hex(TEST_PRIVATE_KEY).unwrap();
        assert!(signer.sign_hash(&[1u8; 20]).is_err());
    }

    #[test]
    fn test_ed25519_rfc8032_vector() {
        let signer = LocalEd25519Signer::from_hex(
            "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
        )
        .unwrap();
        assert_eq!(
            signer.public_key().to_hex(),
            "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
        );
        assert_eq!(
            signer.sign_hash(&[]).unwrap().to_hex(),
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        );
    }

    #[test]
    fn test_ed25519_verify() {
        let signer = LocalEd25519Signer::from_hex(TEST_PRIVATE_KEY).unwrap();
        let hash = sha256(b"cell");
        let sig = signer.sign_hash(&hash).unwrap();
        let verifying_key =
            ed25519_dalek::VerifyingKey::from_bytes(&signer.public_key().try_into().unwrap())
                .unwrap();
        let signature = ed25519_dalek::Signature::from_slice(&sig).unwrap();
        assert!(verifying_key.verify(&hash, &signature).is_ok());
        assert!(LocalEd25519Signer::from_bytes(&[1u8; 31]).is_err());
    }
}
