//! Mutation services: validation and business rules.
//!
//! Each operation is single-shot: validate the typed input, apply the
//! business rules, write through a repository, and return the created
//! record or a structured error. No cross-request state exists.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{BulkCreateResult, CreateCustomerInput, bulk_create_customers, create_customer};
pub use orders::{CreateOrderInput, create_order, recompute_order_total, set_order_products};
pub use products::{CreateProductInput, create_product};
