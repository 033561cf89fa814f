//! Order mutations: creation, total recomputation, product-set replacement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crm_core::{CustomerId, OrderId, ProductId};

use crate::db::{CustomerRepository, OrderRepository, ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::models::{Order, Product};

/// Typed input for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: CustomerId,
    pub product_ids: Vec<ProductId>,
    /// Defaults to the current time.
    pub order_date: Option<DateTime<Utc>>,
}

/// Create an order.
///
/// The total is computed as the exact decimal sum of the resolved
/// products' current prices, and the order row plus its product links are
/// written in one transaction: either the whole order exists or none of
/// it does.
///
/// # Errors
///
/// Returns `NotFound` if the customer or any product ID does not resolve
/// (a partial match is entirely invalid), `Validation` if the product list
/// is empty, or an internal error if persistence fails.
pub async fn create_order(pool: &PgPool, input: CreateOrderInput) -> Result<Order, AppError> {
    let customers = CustomerRepository::new(pool);
    customers
        .get_by_id(input.customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid customer ID".to_string()))?;

    let products = resolve_products(pool, &input.product_ids).await?;
    let total = order_total(products.iter().map(|p| p.price.amount()));

    let orders = OrderRepository::new(pool);
    let order = orders
        .create(
            input.customer_id,
            input.order_date.unwrap_or_else(Utc::now),
            total,
            &input.product_ids,
        )
        .await?;

    Ok(order)
}

/// Explicitly recompute an order's cached total from current prices.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, or an internal error if
/// persistence fails.
pub async fn recompute_order_total(pool: &PgPool, id: OrderId) -> Result<Order, AppError> {
    let orders = OrderRepository::new(pool);
    match orders.recompute_total(id).await {
        Ok(order) => Ok(order),
        Err(RepositoryError::NotFound) => {
            Err(AppError::NotFound("Invalid order ID".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace an order's product set and refresh its total.
///
/// The target set is validated exactly like at creation time, then the
/// join table is diffed: additions and removals are computed explicitly
/// and applied together with the new total in one transaction.
///
/// # Errors
///
/// Returns `NotFound` if the order or any product ID does not resolve,
/// `Validation` if the target set is empty, or an internal error if
/// persistence fails.
pub async fn set_order_products(
    pool: &PgPool,
    id: OrderId,
    product_ids: Vec<ProductId>,
) -> Result<Order, AppError> {
    let products = resolve_products(pool, &product_ids).await?;
    let total = order_total(products.iter().map(|p| p.price.amount()));

    let orders = OrderRepository::new(pool);
    match orders.set_products(id, &product_ids, total).await {
        Ok(order) => Ok(order),
        Err(RepositoryError::NotFound) => {
            Err(AppError::NotFound("Invalid order ID".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve the requested product IDs, treating a partial match as entirely
/// invalid.
///
/// The resolved count is compared against the requested count without
/// deduplication, so a repeated ID fails the same way an unknown one does.
async fn resolve_products(
    pool: &PgPool,
    product_ids: &[ProductId],
) -> Result<Vec<Product>, AppError> {
    let repo = ProductRepository::new(pool);
    let products = repo.get_by_ids(product_ids).await?;

    if products.len() != product_ids.len() {
        return Err(AppError::NotFound("Some product IDs are invalid".to_string()));
    }

    if products.is_empty() {
        return Err(AppError::Validation(
            "Order must include at least one product".to_string(),
        ));
    }

    Ok(products)
}

/// Exact decimal sum of product prices.
fn order_total<I: IntoIterator<Item = Decimal>>(prices: I) -> Decimal {
    prices.into_iter().sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_order_total_exact() {
        let prices = vec![
            Decimal::from_str("10.00").unwrap(),
            Decimal::from_str("5.50").unwrap(),
        ];
        assert_eq!(order_total(prices).to_string(), "15.50");
    }

    #[test]
    fn test_order_total_seed_dataset() {
        // Laptop + Mouse from the demo dataset
        let prices = vec![
            Decimal::from_str("999.99").unwrap(),
            Decimal::from_str("25.50").unwrap(),
        ];
        assert_eq!(order_total(prices).to_string(), "1025.49");
    }

    #[test]
    fn test_order_total_empty_is_zero() {
        assert_eq!(order_total(Vec::new()), Decimal::ZERO);
    }
}
