use bitcoin_hashes::{ripemd160, sha256, Hash};

/// Digest a Cosmos wallet signs for a direct-mode `SignDoc`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    sha256::Hash::hash(data).into_inner()
}

/// `ripemd160(sha256(public_key))`, the 20 byte account id behind bech32
/// Cosmos addresses.
pub fn hash160(public_key: &[u8]) -> [u8; 20] {
    ripemd160::Hash::hash(&sha256(public_key)).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToHex;

    #[test]
    fn test_sign_doc_digest() {
        assert_eq!(
            sha256(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_account_id() {
        assert_eq!(
            hash160(b"").to_hex(),
            "b472a266d0bd89c13706a4132ccfb16f7c3b9fcb"
        );
    }
}
