//! Query-layer plumbing: cursor pagination, ordering, and list pages.
//!
//! List endpoints share one convention: optional filters, an `order_by`
//! field list, and cursor pagination (`first` + `after`). Cursors are
//! opaque tokens over a stable total order; every query appends `id ASC`
//! as a tiebreaker so the order is total.

pub mod cursor;
pub mod order;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use order::{Direction, OrderBy};

/// Default page size when `first` is not supplied.
pub const DEFAULT_PAGE_SIZE: i64 = 50;
/// Upper bound for `first`.
pub const MAX_PAGE_SIZE: i64 = 250;

/// Errors from query-parameter parsing.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The `after` token is not a cursor this service issued.
    #[error("Invalid pagination cursor")]
    InvalidCursor,

    /// `first` is outside 1..=MAX_PAGE_SIZE.
    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange,

    /// An `order_by` field is not sortable for this entity.
    #[error("Cannot order by unknown field: {0}")]
    UnknownOrderField(String),
}

/// Raw pagination parameters from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    /// Maximum number of items to return.
    pub first: Option<i64>,
    /// Opaque continuation token from a previous page's `end_cursor`.
    pub after: Option<String>,
}

impl PageParams {
    /// Resolve raw parameters into a concrete limit/offset pair.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if `first` is out of range or `after` is not a
    /// valid cursor.
    pub fn resolve(&self) -> Result<Paging, QueryError> {
        let limit = self.first.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(QueryError::PageSizeOutOfRange);
        }

        let offset = match &self.after {
            Some(token) => cursor::decode(token)?,
            None => 0,
        };

        Ok(Paging { limit, offset })
    }
}

/// Resolved pagination window.
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub limit: i64,
    pub offset: i64,
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    /// Token for fetching the next page; `None` when the page is empty.
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// One page of a list query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Assemble a page from rows fetched with `LIMIT paging.limit + 1`.
    ///
    /// The extra row, when present, only signals that another page exists;
    /// it is not returned.
    #[must_use]
    pub fn from_rows(mut items: Vec<T>, paging: Paging) -> Self {
        let has_next_page = items.len() as i64 > paging.limit;
        if has_next_page {
            items.truncate(usize::try_from(paging.limit).unwrap_or(usize::MAX));
        }

        let end_cursor =
            (!items.is_empty()).then(|| cursor::encode(paging.offset + items.len() as i64));

        Self {
            items,
            page_info: PageInfo {
                end_cursor,
                has_next_page,
            },
        }
    }

    /// Map the items of a page, keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

/// Escape LIKE/ILIKE metacharacters in user-supplied substrings.
#[must_use]
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let paging = PageParams::default().resolve().unwrap();
        assert_eq!(paging.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(paging.offset, 0);
    }

    #[test]
    fn test_resolve_rejects_bad_first() {
        for first in [0, -5, MAX_PAGE_SIZE + 1] {
            let params = PageParams {
                first: Some(first),
                after: None,
            };
            assert!(matches!(
                params.resolve(),
                Err(QueryError::PageSizeOutOfRange)
            ));
        }
    }

    #[test]
    fn test_resolve_follows_cursor() {
        let params = PageParams {
            first: Some(10),
            after: Some(cursor::encode(30)),
        };
        let paging = params.resolve().unwrap();
        assert_eq!(paging.limit, 10);
        assert_eq!(paging.offset, 30);
    }

    #[test]
    fn test_page_from_rows_with_next() {
        let paging = Paging {
            limit: 2,
            offset: 0,
        };
        let page = Page::from_rows(vec![1, 2, 3], paging);
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, Some(cursor::encode(2)));
    }

    #[test]
    fn test_page_from_rows_last_page() {
        let paging = Paging {
            limit: 5,
            offset: 10,
        };
        let page = Page::from_rows(vec![1, 2], paging);
        assert_eq!(page.items, vec![1, 2]);
        assert!(!page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, Some(cursor::encode(12)));
    }

    #[test]
    fn test_page_from_rows_empty() {
        let paging = Paging {
            limit: 5,
            offset: 0,
        };
        let page = Page::<i32>::from_rows(vec![], paging);
        assert!(page.items.is_empty());
        assert!(!page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, None);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50% off_sale"), "50\\% off\\_sale");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
