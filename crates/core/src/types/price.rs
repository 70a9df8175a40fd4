//! Type-safe price representation using decimal arithmetic.
//!
//! The product API exchanges prices as plain JSON numbers in the store's
//! currency (e.g. `9.99`). `Price` keeps them as [`Decimal`] so that
//! arithmetic and formatting never go through binary floating point, and
//! refuses negative amounts both at construction and when deserializing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display with two decimals (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let result = Price::new(Decimal::new(-1, 2));
        assert!(matches!(result, Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_zero_is_valid() {
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
    }

    #[test]
    fn test_display_uses_two_decimals() {
        assert_eq!(Price::from_cents(999).unwrap().display(), "$9.99");
        assert_eq!(Price::new(Decimal::from(12)).unwrap().to_string(), "$12.00");
    }

    #[test]
    fn test_parse_from_form_input() {
        assert_eq!(" 9.99 ".parse::<Price>().unwrap(), Price::from_cents(999).unwrap());
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert!(matches!("-3".parse::<Price>(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_json_number_wire_format() {
        let price: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(price, Price::from_cents(999).unwrap());
        assert_eq!(serde_json::to_string(&price).unwrap(), "9.99");
    }

    #[test]
    fn test_negative_json_rejected() {
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }
}
