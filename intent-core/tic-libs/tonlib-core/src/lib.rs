pub mod cell;
pub mod types;
pub mod wallet;

pub type TonHash = [u8; 32];
