//! Opaque pagination cursors.
//!
//! A cursor encodes an offset into the stable order of a list query,
//! base64-wrapped so clients treat it as opaque. Tokens are deliberately
//! not signed; a forged offset can only move the window, never widen it.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use super::QueryError;

const PREFIX: &str = "crmcursor";

/// Encode an offset as an opaque continuation token.
#[must_use]
pub fn encode(offset: i64) -> String {
    STANDARD.encode(format!("{PREFIX}:{offset}"))
}

/// Decode a continuation token back into an offset.
///
/// # Errors
///
/// Returns [`QueryError::InvalidCursor`] for anything this service did not
/// issue: bad base64, a wrong prefix, or a negative offset.
pub fn decode(token: &str) -> Result<i64, QueryError> {
    let bytes = STANDARD
        .decode(token)
        .map_err(|_| QueryError::InvalidCursor)?;
    let decoded = String::from_utf8(bytes).map_err(|_| QueryError::InvalidCursor)?;

    let offset = decoded
        .strip_prefix(PREFIX)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or(QueryError::InvalidCursor)?;

    if offset < 0 {
        return Err(QueryError::InvalidCursor);
    }

    Ok(offset)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        for offset in [0, 1, 50, 12_345] {
            assert_eq!(decode(&encode(offset)).unwrap(), offset);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode("not base64 at all!").is_err());
        assert!(decode(&STANDARD.encode("wrongprefix:5")).is_err());
        assert!(decode(&STANDARD.encode("crmcursor:abc")).is_err());
        assert!(decode(&STANDARD.encode("crmcursor:-1")).is_err());
        assert!(decode("").is_err());
    }
}
