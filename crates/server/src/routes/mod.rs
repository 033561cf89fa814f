//! HTTP route handlers for the CRM API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Customers
//! POST /customers              - Create a customer
//! POST /customers/bulk         - Create customers in bulk (per-row errors)
//! GET  /customers              - List customers (filter/order/paginate)
//!
//! # Products
//! POST /products               - Create a product
//! GET  /products               - List products (filter/order/paginate)
//!
//! # Orders
//! POST /orders                 - Create an order
//! GET  /orders                 - List orders (filter/order/paginate)
//! POST /orders/{id}/total      - Recompute an order's cached total
//! PUT  /orders/{id}/products   - Replace an order's product set
//! ```

pub mod customers;
pub mod orders;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(customers::router())
        .merge(products::router())
        .merge(orders::router())
}
