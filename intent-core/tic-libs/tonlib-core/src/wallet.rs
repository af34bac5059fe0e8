use std::str::FromStr;
use std::sync::Arc;

pub use types::*;

use crate::cell::{ArcCell, BagOfCells, Cell, StateInitBuilder, TonCellError};
use crate::types::TonAddress;

mod types;

pub const DEFAULT_WALLET_ID_V5R1: i32 = 0x7FFFFF11;
pub const DEFAULT_WALLET_ID: i32 = 0x29a9a317;

pub const WALLET_V3R2_CODE: &str = "te6cckEBAQEAcQAA3v8AIN0gggFMl7ohggEznLqxn3Gw7UTQ0x/THzHXC//jBOCk8mCDCNcYINMf0x/TH/gjE7vyY+1E0NMf0x/T/9FRMrryoVFEuvKiBPkBVBBV+RDyo/gAkyDXSpbTB9QC+wDo0QGkyMsfyx/L/8ntVBC9ba0=";
pub const WALLET_V4R2_CODE: &str = "te6cckECFAEAAtQAART/APSkE/S88sgLAQIBIAIDAgFIBAUE+PKDCNcYINMf0x/THwL4I7vyZO1E0NMf0x/T//QE0VFDuvKhUVG68qIF+QFUEGT5EPKj+AAkpMjLH1JAyx9SMMv/UhD0AMntVPgPAdMHIcAAn2xRkyDXSpbTB9QC+wDoMOAhwAHjACHAAuMAAcADkTDjDQOkyMsfEssfy/8QERITAubQAdDTAyFxsJJfBOAi10nBIJJfBOAC0x8hghBwbHVnvSKCEGRzdHK9sJJfBeAD+kAwIPpEAcjKB8v/ydDtRNCBAUDXIfQEMFyBAQj0Cm+hMbOSXwfgBdM/yCWCEHBsdWe6kjgw4w0DghBkc3RyupJfBuMNBgcCASAICQB4AfoA9AQw+CdvIjBQCqEhvvLgUIIQcGx1Z4MesXCAGFAEywUmzxZY+gIZ9ADLaRfLH1Jgyz8gyYBA+wAGAIpQBIEBCPRZMO1E0IEBQNcgyAHPFvQAye1UAXKwjiOCEGRzdHKDHrFwgBhQBcsFUAPPFiP6AhPLassfyz/JgED7AJJfA+ICASAKCwBZvSQrb2omhAgKBrkPoCGEcNQICEekk30pkQzmkD6f+YN4EoAbeBAUiYcVnzGEAgFYDA0AEbjJftRNDXCx+AA9sp37UTQgQFA1yH0BDACyMoHy//J0AGBAQj0Cm+hMYAIBIA4PABmtznaiaEAga5Drhf/AABmvHfaiaEAQa5DrhY/AAG7SB/oA1NQi+QAFyMoHFcv/ydB3dIAYyMsFywIizxZQBfoCFMtrEszMyXP7AMhAFIEBCPRR8qcCAHCBAQjXGPoA0z/IVCBHgQEI9FHyp4IQbm90ZXB0gBjIywXLAlAGzxZQBPoCFMtqEssfyz/Jc/sAAgBsgQEI1xj6ANM/MFIkgQEI9Fnyp4IQZHN0cnB0gBjIywXLAlAFzxZQA/oCE8tqyx8Syz/Jc/sAAAr0AMntVGliJeU=";
pub const WALLET_V5R1_CODE: &str = "te6ccgECFAEAAoEAART/APSkE/S88sgLAQIBIAIDAgFIBAUBAvIOAtzQINdJwSCRW49jINcLHyCCEGV4dG69IYIQc2ludL2wkl8D4IIQZXh0brqOtIAg1yEB0HTXIfpAMPpE+Cj6RDBYvZFb4O1E0IEBQdch9AWDB/QOb6ExkTDhgEDXIXB/2zzgMSDXSYECgLmRMOBw4hAPAgEgBgcCASAICQAZvl8PaiaECAoOuQ+gLAIBbgoLAgFIDA0AGa3OdqJoQCDrkOuF/8AAGa8d9qJoQBDrkOuFj8AAF7Ml+1E0HHXIdcLH4AARsmL7UTQ1woAgAR4g1wsfghBzaWduuvLgin8PAeaO8O2i7fshgwjXIgKDCNcjIIAg1yHTH9Mf0x/tRNDSANMfINMf0//XCgAK+QFAzPkQmiiUXwrbMeHywIffArNQB7Dy0IRRJbry4IVQNrry4Ib4I7vy0IgikvgA3gGkf8jKAMsfAc8Wye1UIJL4D95w2zzYEAP27aLt+wL0BCFukmwhjkwCIdc5MHCUIccAs44tAdcoIHYeQ2wg10nACPLgkyDXSsAC8uCTINcdBscSwgBSMLDy0InXTNc5MAGk6GwShAe78uCT10rAAPLgk+1V4tIAAcAAkVvg69csCBQgkXCWAdcsCBwS4lIQseMPINdKERITAJYB+kAB+kT4KPpEMFi68uCR7UTQgQFB1xj0BQSdf8jKAEAEgwf0U/Lgi44UA4MH9Fvy4Iwi1woAIW4Bs7Dy0JDiyFADzxYS9ADJ7VQAcjDXLAgkji0h8uCS0gDtRNDSAFETuvLQj1RQMJExnAGBAUDXIdcKAPLgjuLIygBYzxbJ7VST8sCN4gAQk1vbMeHXTNA=";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum WalletVersion {
    V3R2,
    V4R2,
    V5R1,
}

impl WalletVersion {
    pub fn code(&self) -> Result<ArcCell, TonCellError> {
        let code = match self {
            WalletVersion::V3R2 => WALLET_V3R2_CODE,
            WalletVersion::V4R2 => WALLET_V4R2_CODE,
            WalletVersion::V5R1 => WALLET_V5R1_CODE,
        };
        let bag_of_cells = BagOfCells::parse_base64(code)?;
        let cell = bag_of_cells.single_root()?;
        Ok(cell.clone())
    }

    pub fn default_wallet_id(&self) -> i32 {
        match self {
            WalletVersion::V3R2 | WalletVersion::V4R2 => DEFAULT_WALLET_ID,
            WalletVersion::V5R1 => DEFAULT_WALLET_ID_V5R1,
        }
    }

    /// Persistent data of a freshly deployed wallet.
    pub fn initial_data(&self, key: &[u8], wallet_id: i32) -> Result<ArcCell, TonCellError> {
        if key.len() != 32 {
            return Err(TonCellError::InternalError(format!(
                "Public key must be 32 bytes, got {}",
                key.len()
            )));
        }
        let mut public_key: [u8; 32] = [0; 32];
        public_key.copy_from_slice(key);
        let data_cell: Cell = match &self {
            WalletVersion::V3R2 => WalletDataV3 {
                seqno: 0,
                wallet_id,
                public_key,
            }
            .try_into()?,
            WalletVersion::V4R2 => WalletDataV4 {
                seqno: 0,
                wallet_id,
                public_key,
            }
            .try_into()?,
            WalletVersion::V5R1 => WalletDataV5 {
                signature_allowed: true,
                seqno: 0,
                wallet_id,
                public_key,
            }
            .try_into()?,
        };

        Ok(Arc::new(data_cell))
    }

    /// `StateInit` cell deploying this wallet for `key`.
    pub fn state_init(&self, key: &[u8], wallet_id: i32) -> Result<ArcCell, TonCellError> {
        let code = self.code()?;
        let data = self.initial_data(key, wallet_id)?;
        Ok(StateInitBuilder::new(&code, &data).build()?.to_arc())
    }

    /// Address of the wallet on the basechain, the hash of its `StateInit`.
    pub fn address(&self, key: &[u8], wallet_id: i32) -> Result<TonAddress, TonCellError> {
        let state_init = self.state_init(key, wallet_id)?;
        Ok(TonAddress::new(0, &state_init.cell_hash()))
    }

    pub fn from_code(code: &str) -> Result<WalletVersion, TonCellError> {
        let wallet_version = match code {
            WALLET_V3R2_CODE => WalletVersion::V3R2,
            WALLET_V4R2_CODE => WalletVersion::V4R2,
            WALLET_V5R1_CODE => WalletVersion::V5R1,
            _ => return Err(TonCellError::InvalidInitCode(code.to_string())),
        };

        Ok(wallet_version)
    }
}

impl FromStr for WalletVersion {
    type Err = TonCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "V3R2" => Ok(WalletVersion::V3R2),
            "V4R2" => Ok(WalletVersion::V4R2),
            "V5R1" => Ok(WalletVersion::V5R1),
            _ => Err(TonCellError::InternalError(format!(
                "Unknown wallet version {}",
                s
            ))),
        }
    }
}
