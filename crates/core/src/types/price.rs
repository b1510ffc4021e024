//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be positive (got {0})")]
    NotPositive(Decimal),
    /// The amount could not be parsed as a decimal.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A strictly positive monetary amount.
///
/// Serializes as a decimal string (`"149.99"`) to avoid floating-point
/// drift across the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Price {
    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the amount is zero or negative.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// Parse a price from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Invalid`] if the string is not a decimal,
    /// or [`PriceError::NotPositive`] if it is zero or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_amounts() {
        let price = Price::parse("149.99").unwrap();
        assert_eq!(price.to_string(), "149.99");
    }

    #[test]
    fn rejects_zero() {
        assert!(matches!(
            Price::parse("0"),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn rejects_negative() {
        assert!(matches!(
            Price::parse("-5.00"),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Price::parse("lots"),
            Err(PriceError::Invalid(_))
        ));
    }

    #[test]
    fn serializes_as_string() {
        let price = Price::parse("42.50").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"42.50\"");
        let back: Price = serde_json::from_str("\"42.50\"").unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn deserialization_enforces_positivity() {
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
        assert!(serde_json::from_str::<Price>("\"0\"").is_err());
    }
}
