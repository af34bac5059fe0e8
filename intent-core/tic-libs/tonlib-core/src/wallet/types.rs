use crate::cell::{Cell, CellBuilder, TonCellError};

/// WalletVersion::V3R2
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WalletDataV3 {
    pub seqno: u32,
    pub wallet_id: i32,
    pub public_key: [u8; 32],
}

impl TryFrom<Cell> for WalletDataV3 {
    type Error = TonCellError;

    fn try_from(value: Cell) -> Result<Self, Self::Error> {
        let mut parser = value.parser();
        let seqno = parser.load_u32(32)?;
        let wallet_id = parser.load_i32(32)?;
        let mut public_key = [0u8; 32];
        parser.load_slice(&mut public_key)?;
        parser.ensure_empty()?;
        Ok(Self {
            seqno,
            wallet_id,
            public_key,
        })
    }
}

impl TryFrom<WalletDataV3> for Cell {
    type Error = TonCellError;

    fn try_from(value: WalletDataV3) -> Result<Self, Self::Error> {
        CellBuilder::new()
            .store_u32(32, value.seqno)?
            .store_i32(32, value.wallet_id)?
            .store_slice(&value.public_key)?
            .build()
    }
}

/// WalletVersion::V4R2, the V3 layout followed by an empty plugin dictionary.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WalletDataV4 {
    pub seqno: u32,
    pub wallet_id: i32,
    pub public_key: [u8; 32],
}

impl TryFrom<Cell> for WalletDataV4 {
    type Error = TonCellError;

    fn try_from(value: Cell) -> Result<Self, Self::Error> {
        let mut parser = value.parser();
        let seqno = parser.load_u32(32)?;
        let wallet_id = parser.load_i32(32)?;
        let mut public_key = [0u8; 32];
        parser.load_slice(&mut public_key)?;
        // plugins dictionary, only the empty form is produced here
        parser.load_bit()?;
        parser.ensure_empty()?;
        Ok(Self {
            seqno,
            wallet_id,
            public_key,
        })
    }
}

impl TryFrom<WalletDataV4> for Cell {
    type Error = TonCellError;

    fn try_from(value: WalletDataV4) -> Result<Self, Self::Error> {
        CellBuilder::new()
            .store_u32(32, value.seqno)?
            .store_i32(32, value.wallet_id)?
            .store_slice(&value.public_key)?
            .store_bit(false)?
            .build()
    }
}

/// WalletVersion::V5R1
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WalletDataV5 {
    pub signature_allowed: bool,
    pub seqno: u32,
    pub wallet_id: i32,
    pub public_key: [u8; 32],
}

impl TryFrom<Cell> for WalletDataV5 {
    type Error = TonCellError;

    fn try_from(value: Cell) -> Result<Self, Self::Error> {
        let mut parser = value.parser();
        let signature_allowed = parser.load_bit()?;
        let seqno = parser.load_u32(32)?;
        let wallet_id = parser.load_i32(32)?;
        let mut public_key = [0u8; 32];
        parser.load_slice(&mut public_key)?;
        // extensions dictionary
        if parser.load_bit()? {
            parser.load_ref()?;
        }
        parser.ensure_empty()?;
        Ok(Self {
            signature_allowed,
            seqno,
            wallet_id,
            public_key,
        })
    }
}

impl TryFrom<WalletDataV5> for Cell {
    type Error = TonCellError;

    fn try_from(value: WalletDataV5) -> Result<Self, Self::Error> {
        CellBuilder::new()
            .store_bit(value.signature_allowed)?
            .store_u32(32, value.seqno)?
            .store_i32(32, value.wallet_id)?
            .store_slice(&value.public_key)?
            .store_bit(false)?
            .build()
    }
}
