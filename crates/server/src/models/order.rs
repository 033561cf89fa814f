//! Order domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crm_core::{CustomerId, OrderId, ProductId};

/// An order record with its linked products.
///
/// `total_amount` is a cached derived value: the sum of the linked products'
/// prices at the moment it was last (re)computed. Product price changes do
/// not update it; recomputation happens only on explicit request.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub product_ids: Vec<ProductId>,
}
