//! Customer domain model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crm_core::{CustomerId, Email, Phone};

/// A customer record.
///
/// Customers are created individually or in bulk; they are never updated or
/// deleted through the API. Deleting a customer row cascades to its orders.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<Phone>,
    pub created_at: DateTime<Utc>,
}
