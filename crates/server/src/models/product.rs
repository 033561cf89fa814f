//! Product domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crm_core::{Price, ProductId};

/// A product record.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Units on hand; never negative.
    pub stock: i32,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}
