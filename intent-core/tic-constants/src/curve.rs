use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveType {
    SECP256k1, /* "secp256k1" */
    ED25519,   /* "ed25519" */
}

impl FromStr for CurveType {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> std::result::Result<CurveType, Self::Err> {
        match input {
            "SECP256k1" => Ok(CurveType::SECP256k1),
            "ED25519" => Ok(CurveType::ED25519),
            _ => Err(anyhow!("invalid_curve_type")),
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let curve_str = match self {
            CurveType::SECP256k1 => "SECP256k1",
            CurveType::ED25519 => "ED25519",
        };
        write!(f, "{}", curve_str)
    }
}
