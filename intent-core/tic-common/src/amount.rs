use crate::{Result, TransferError};

/// Parses a non-negative integer amount already in the smallest unit.
pub fn parse_integer_amount(value: &str) -> Result<u128> {
    let value = value.trim();
    tic_ensure!(
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
        TransferError::InvalidAmount
    );
    value
        .parse::<u128>()
        .map_err(|_| TransferError::InvalidAmount.into())
}

/// Scales a decimal string by `10^decimals`, e.g. `parse_units("0.01", 9)`
/// is `10_000_000`. More fractional digits than `decimals` is an error.
pub fn parse_units(value: &str, decimals: u32) -> Result<u128> {
    let value = value.trim();
    let (int_part, frac_part) = match value.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (value, ""),
    };
    tic_ensure!(
        !(int_part.is_empty() && frac_part.is_empty()),
        TransferError::InvalidAmount
    );
    tic_ensure!(
        int_part.bytes().all(|b| b.is_ascii_digit())
            && frac_part.bytes().all(|b| b.is_ascii_digit()),
        TransferError::InvalidAmount
    );
    tic_ensure!(
        frac_part.len() <= decimals as usize,
        TransferError::InvalidAmount
    );

    let scale = 10u128
        .checked_pow(decimals)
        .ok_or(TransferError::InvalidAmount)?;
    let int_value = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse::<u128>()
            .map_err(|_| TransferError::InvalidAmount)?
    };
    let frac_value = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
        padded
            .parse::<u128>()
            .map_err(|_| TransferError::InvalidAmount)?
    };

    int_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| TransferError::InvalidAmount.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer_error;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("0.01", 9).unwrap(), 10_000_000);
        assert_eq!(parse_units("0.05", 9).unwrap(), 50_000_000);
        assert_eq!(parse_units("1", 9).unwrap(), 1_000_000_000);
        assert_eq!(parse_units("12.5", 9).unwrap(), 12_500_000_000);
        assert_eq!(parse_units(".5", 9).unwrap(), 500_000_000);
        assert_eq!(parse_units("3.", 9).unwrap(), 3_000_000_000);
    }

    #[test]
    fn test_parse_units_invalid() {
        for value in ["", ".", "abc", "-1", "1.0000000001", "1,5", "1.2.3"] {
            let err = parse_units(value, 9).unwrap_err();
            assert_eq!(transfer_error(&err), Some(&TransferError::InvalidAmount));
        }
    }

    #[test]
    fn test_parse_integer_amount() {
        assert_eq!(parse_integer_amount("1000").unwrap(), 1000);
        assert!(parse_integer_amount("1.5").is_err());
        assert!(parse_integer_amount("").is_err());
        assert!(parse_integer_amount("-3").is_err());
    }
}
