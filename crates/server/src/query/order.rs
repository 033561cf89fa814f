//! `order_by` parsing against per-entity column whitelists.

use super::QueryError;

/// Sort direction for one ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated ORDER BY clause.
///
/// Built from a comma-separated field list; a leading `-` marks a field as
/// descending. Field names must appear in the entity's whitelist, which is
/// what keeps the interpolated clause injection-proof. `id ASC` is always
/// appended as a tiebreaker unless `id` was ordered explicitly.
#[derive(Debug, Clone)]
pub struct OrderBy {
    terms: Vec<(&'static str, Direction)>,
}

impl OrderBy {
    /// Parse an `order_by` specification.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownOrderField`] if a field is not in
    /// `allowed`.
    pub fn parse(expr: Option<&str>, allowed: &[&'static str]) -> Result<Self, QueryError> {
        let mut terms: Vec<(&'static str, Direction)> = Vec::new();

        for raw in expr.unwrap_or("").split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let (name, direction) = raw.strip_prefix('-').map_or(
                (raw, Direction::Asc),
                |stripped| (stripped, Direction::Desc),
            );

            let column = allowed
                .iter()
                .find(|&&col| col == name)
                .copied()
                .ok_or_else(|| QueryError::UnknownOrderField(name.to_string()))?;

            if !terms.iter().any(|(col, _)| *col == column) {
                terms.push((column, direction));
            }
        }

        // Stable total order for cursor pagination
        if !terms.iter().any(|(col, _)| *col == "id") {
            terms.push(("id", Direction::Asc));
        }

        Ok(Self { terms })
    }

    /// Render as a SQL ORDER BY body (without the `ORDER BY` keyword).
    ///
    /// Only whitelisted identifiers reach this string.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.terms
            .iter()
            .map(|(col, dir)| format!("{col} {}", dir.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALLOWED: &[&str] = &["id", "name", "email", "created_at"];

    #[test]
    fn test_default_is_id_asc() {
        let order = OrderBy::parse(None, ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "id ASC");

        let order = OrderBy::parse(Some(""), ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "id ASC");
    }

    #[test]
    fn test_parse_mixed_directions() {
        let order = OrderBy::parse(Some("-name,created_at"), ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "name DESC, created_at ASC, id ASC");
    }

    #[test]
    fn test_explicit_id_not_duplicated() {
        let order = OrderBy::parse(Some("-id"), ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "id DESC");
    }

    #[test]
    fn test_duplicate_field_kept_once() {
        let order = OrderBy::parse(Some("name,-name"), ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "name ASC, id ASC");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = OrderBy::parse(Some("password"), ALLOWED).unwrap_err();
        assert!(matches!(err, QueryError::UnknownOrderField(f) if f == "password"));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let order = OrderBy::parse(Some(" -email , name "), ALLOWED).unwrap();
        assert_eq!(order.to_sql(), "email DESC, name ASC, id ASC");
    }
}
