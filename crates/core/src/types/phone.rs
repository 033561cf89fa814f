//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input matches neither accepted format.
    #[error("invalid phone format, use +1234567890 or 123-456-7890")]
    InvalidFormat,
}

/// A customer phone number.
///
/// Two formats are accepted:
///
/// - International: `+` followed by one or more digits (`+1234567890`)
/// - Hyphenated: digit groups separated by single hyphens (`123-456-7890`)
///
/// The value is stored exactly as given; no normalization is applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or matches neither
    /// `+<digits>` nor `<digits>[-<digits>]*`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.strip_prefix('+').is_some_and(is_digits) || is_hyphenated_digits(s) {
            return Ok(Self(s.to_owned()));
        }

        Err(PhoneError::InvalidFormat)
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// One or more digit groups separated by single hyphens.
fn is_hyphenated_digits(s: &str) -> bool {
    s.split('-').all(is_digits)
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Phone {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Phone {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_international() {
        assert!(Phone::parse("+1234567890").is_ok());
        assert!(Phone::parse("+1").is_ok());
    }

    #[test]
    fn test_parse_hyphenated() {
        assert!(Phone::parse("123-456-7890").is_ok());
        assert!(Phone::parse("1234567890").is_ok());
        assert!(Phone::parse("12-34").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Phone::parse("+").is_err());
        assert!(Phone::parse("+12-34").is_err());
        assert!(Phone::parse("abc").is_err());
        assert!(Phone::parse("123--456").is_err());
        assert!(Phone::parse("-123").is_err());
        assert!(Phone::parse("123-").is_err());
        assert!(Phone::parse("(123) 456").is_err());
    }

    #[test]
    fn test_stored_verbatim() {
        let phone = Phone::parse("123-456-7890").unwrap();
        assert_eq!(phone.as_str(), "123-456-7890");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+1234567890").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+1234567890\"");

        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
