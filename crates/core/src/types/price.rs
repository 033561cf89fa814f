//! Decimal-backed price type.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The input is not a decimal number at all.
    #[error("invalid decimal format for price")]
    Unparsable,
    /// The parsed value is zero or negative.
    #[error("price must be positive")]
    NotPositive,
    /// The parsed value has more than two decimal places.
    #[error("price cannot have more than {max} decimal places")]
    TooPrecise {
        /// Maximum allowed decimal places.
        max: u32,
    },
    /// The parsed value exceeds the storable range.
    #[error("price cannot have more than {max} integer digits")]
    TooLarge {
        /// Maximum allowed integer digits.
        max: u32,
    },
}

/// A positive product price with fixed precision.
///
/// Prices are stored as `NUMERIC(10,2)`: up to 8 integer digits and exactly
/// 2 decimal places. Arithmetic goes through [`Decimal`], so sums like
/// `10.00 + 5.50` are exact with no floating-point drift.
///
/// Serializes to a JSON string (`"999.99"`) to preserve precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Price {
    /// Maximum decimal places (`NUMERIC(10,2)` scale).
    pub const MAX_SCALE: u32 = 2;
    /// Maximum integer digits (`NUMERIC(10,2)` precision minus scale).
    pub const MAX_INTEGER_DIGITS: u32 = 8;

    /// Parse a `Price` from a decimal-formatted string.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Unparsable`] if the input is not a decimal
    /// number, and a validation error if the value is not positive or does
    /// not fit in `NUMERIC(10,2)`.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::Unparsable)?;
        Self::try_from_decimal(amount)
    }

    /// Validate a raw [`Decimal`] as a price.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the value is not positive or does not
    /// fit in `NUMERIC(10,2)`.
    pub fn try_from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        let normalized = amount.normalize();
        if normalized.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooPrecise {
                max: Self::MAX_SCALE,
            });
        }

        if normalized.trunc() >= Decimal::from(10_i64.pow(Self::MAX_INTEGER_DIGITS)) {
            return Err(PriceError::TooLarge {
                max: Self::MAX_INTEGER_DIGITS,
            });
        }

        // Store with the canonical two-decimal scale
        let mut canonical = amount;
        canonical.rescale(Self::MAX_SCALE);
        Ok(Self(canonical))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Price::parse("999.99").unwrap().to_string(), "999.99");
        assert_eq!(Price::parse("25.5").unwrap().to_string(), "25.50");
        assert_eq!(Price::parse("10").unwrap().to_string(), "10.00");
        assert_eq!(Price::parse(" 45.75 ").unwrap().to_string(), "45.75");
    }

    #[test]
    fn test_parse_unparsable() {
        assert!(matches!(Price::parse("abc"), Err(PriceError::Unparsable)));
        assert!(matches!(Price::parse(""), Err(PriceError::Unparsable)));
        assert!(matches!(Price::parse("12.3.4"), Err(PriceError::Unparsable)));
    }

    #[test]
    fn test_parse_not_positive() {
        assert!(matches!(Price::parse("0"), Err(PriceError::NotPositive)));
        assert!(matches!(Price::parse("0.00"), Err(PriceError::NotPositive)));
        assert!(matches!(Price::parse("-1"), Err(PriceError::NotPositive)));
    }

    #[test]
    fn test_parse_too_precise() {
        assert!(matches!(
            Price::parse("1.999"),
            Err(PriceError::TooPrecise { .. })
        ));
        // Trailing zeros beyond two places are still two places of precision
        assert!(Price::parse("1.990").is_ok());
    }

    #[test]
    fn test_parse_too_large() {
        assert!(Price::parse("99999999.99").is_ok());
        assert!(matches!(
            Price::parse("100000000.00"),
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_exact_sum() {
        let a = Price::parse("10.00").unwrap();
        let b = Price::parse("5.50").unwrap();
        let total = a.amount() + b.amount();
        assert_eq!(total.to_string(), "15.50");
    }

    #[test]
    fn test_serde_as_string() {
        let price = Price::parse("999.99").unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"999.99\"");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
