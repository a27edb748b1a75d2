//! Conversion between decimal ETH amounts and wei.
//!
//! Wei arithmetic is done by `ethers`; `Decimal` is what the read models and
//! the HTTP layer carry.

use ethers::types::U256;
use ethers::utils;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Smallest-unit decimals of the native currency.
pub const ETHER_DECIMALS: u32 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("Invalid amount: {0}")]
    Malformed(String),

    #[error("Amount must not be negative")]
    Negative,

    #[error("Amount has more than 18 fractional digits")]
    TooPrecise,

    #[error("Amount out of range")]
    Overflow,

    #[error("Amount must be greater than zero")]
    NotPositive,
}

/// Convert a decimal ETH amount into wei.
pub fn parse_ether(amount: Decimal) -> Result<U256, UnitError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(UnitError::Negative);
    }

    let normalized = amount.abs().normalize();
    if normalized.scale() > ETHER_DECIMALS {
        return Err(UnitError::TooPrecise);
    }

    utils::parse_ether(normalized.to_string()).map_err(|_| UnitError::Overflow)
}

/// Parse a user-entered ETH string (e.g. `"0.25"`) into wei.
pub fn parse_ether_str(amount: &str) -> Result<U256, UnitError> {
    let trimmed = amount.trim();
    let value = Decimal::from_str(trimmed).map_err(|_| UnitError::Malformed(trimmed.to_string()))?;
    parse_ether(value)
}

/// Like [`parse_ether_str`], but zero is rejected.
pub fn parse_positive_ether_str(amount: &str) -> Result<U256, UnitError> {
    let wei = parse_ether_str(amount)?;
    if wei.is_zero() {
        return Err(UnitError::NotPositive);
    }
    Ok(wei)
}

/// Convert wei into a decimal ETH amount.
///
/// Fails with [`UnitError::Overflow`] when the amount does not fit a `Decimal`.
pub fn format_ether(wei: U256) -> Result<Decimal, UnitError> {
    Decimal::from_str_exact(&utils::format_ether(wei))
        .map(|d| d.normalize())
        .map_err(|_| UnitError::Overflow)
}

/// Whole ETH expressed in wei
#[cfg(test)]
pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * utils::WEI_IN_ETHER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional_amounts() {
        assert_eq!(parse_ether(Decimal::from(5)).unwrap(), ether(5));
        assert_eq!(
            parse_ether_str("7.5").unwrap(),
            U256::from(7_500_000_000_000_000_000u128)
        );
        assert_eq!(parse_ether_str("0.000000000000000001").unwrap(), U256::one());
        assert_eq!(parse_ether_str(" 0 ").unwrap(), U256::zero());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_ether_str("-1"), Err(UnitError::Negative));
        assert_eq!(
            parse_ether_str("0.0000000000000000001"),
            Err(UnitError::TooPrecise)
        );
        assert!(matches!(parse_ether_str("abc"), Err(UnitError::Malformed(_))));
        assert!(matches!(parse_ether_str(""), Err(UnitError::Malformed(_))));
        assert_eq!(parse_positive_ether_str("0.0"), Err(UnitError::NotPositive));
        assert_eq!(
            parse_positive_ether_str("0.1").unwrap(),
            U256::from(100_000_000_000_000_000u128)
        );
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        // 1.50000000000000000000 has scale 20 before normalization
        let value = Decimal::from_str("1.50000000000000000000").unwrap();
        assert_eq!(parse_ether(value).unwrap(), U256::from(1_500_000_000_000_000_000u128));
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(ether(3)).unwrap(), Decimal::from(3));
        assert_eq!(
            format_ether(U256::from(250_000_000_000_000_000u128)).unwrap(),
            Decimal::from_str("0.25").unwrap()
        );
        assert_eq!(format_ether(U256::zero()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_format_rejects_amounts_beyond_decimal_range() {
        // 2^128 wei is about 3.4e20 ETH, more digits than a Decimal holds
        let wei = U256::from(u128::MAX) + U256::one();
        assert!(format_ether(wei).is_err());
        assert_eq!(format_ether(U256::MAX), Err(UnitError::Overflow));

        let large = ether(1_000_000_000);
        assert_eq!(format_ether(large).unwrap(), Decimal::from(1_000_000_000u64));
    }
}
