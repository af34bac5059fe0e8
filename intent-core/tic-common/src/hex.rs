use crate::Result;

/// Lowercase hex for tx bodies, signatures and message hashes.
pub trait ToHex {
    fn to_hex(&self) -> String;
}

impl<T: AsRef<[u8]>> ToHex for T {
    fn to_hex(&self) -> String {
        hex::encode(self)
    }
}

/// Decodes key material pasted as hex, with or without a leading `0x`.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    Ok(hex::decode(digits)?)
}
