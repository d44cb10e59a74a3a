use crate::error::{Result, VaultError};
use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::{B256, U256};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub raw: U256,
    pub decimals: u8,
    pub symbol: String,
}

impl Balance {
    pub fn new(raw: U256, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            raw,
            decimals,
            symbol: symbol.into(),
        }
    }

    /// Decimal rendering with trailing zeros trimmed, e.g. `1.5`.
    pub fn formatted(&self) -> String {
        format_amount(self.raw, self.decimals)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.formatted(), self.symbol)
    }
}

/// Hash of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub B256);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a human amount such as `0.25` into base units for `decimals`.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(VaultError::InvalidAmount(format!("'{}' is not a positive amount", amount)));
    }

    parse_units(trimmed, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| VaultError::InvalidAmount(format!("'{}': {}", amount, e)))
}

pub fn format_amount(raw: U256, decimals: u8) -> String {
    let text = match format_units(raw, decimals) {
        Ok(text) => text,
        Err(_) => return raw.to_string(),
    };

    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        let one_and_half = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_amount(one_and_half, 18), "1.5");
        assert_eq!(format_amount(U256::from(1_000_000u64), 6), "1");
        assert_eq!(format_amount(U256::ZERO, 18), "0");
        assert_eq!(format_amount(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("0.25", 18).unwrap(),
            U256::from(250_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount("12", 6).unwrap(), U256::from(12_000_000u64));
        assert_eq!(parse_amount(" 7 ", 0).unwrap(), U256::from(7u64));
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
    }

    #[test]
    fn test_balance_display() {
        let balance = Balance::new(U256::from(2_500_000u64), 6, "USDC");
        assert_eq!(balance.to_string(), "2.5 USDC");
    }
}
