//! Product mutations.

use serde::Deserialize;
use sqlx::PgPool;

use crm_core::{Price, PriceError};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::models::Product;

/// Typed input for creating a product.
///
/// `price` arrives as a decimal-formatted string so precision survives the
/// JSON boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub price: String,
    pub stock: Option<i32>,
    pub description: Option<String>,
}

/// Create a product.
///
/// # Errors
///
/// Returns `Format` if the price string is not a decimal number,
/// `Validation` if the price is not positive or the stock is negative, or
/// an internal error if persistence fails.
pub async fn create_product(pool: &PgPool, input: CreateProductInput) -> Result<Product, AppError> {
    let price = parse_price(&input.price)?;

    let stock = input.stock.unwrap_or(0);
    if stock < 0 {
        return Err(AppError::Validation("Stock cannot be negative".to_string()));
    }

    let repo = ProductRepository::new(pool);
    let product = repo
        .insert(&input.name, input.description.as_deref(), price, stock)
        .await?;

    Ok(product)
}

/// Parse a price string, distinguishing unparsable input (a format error)
/// from out-of-range values (validation errors).
fn parse_price(raw: &str) -> Result<Price, AppError> {
    Price::parse(raw).map_err(|e| match e {
        PriceError::Unparsable => {
            AppError::Format("Invalid decimal format for price".to_string())
        }
        PriceError::NotPositive => AppError::Validation("Price must be positive".to_string()),
        other => AppError::Validation(other.to_string()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_valid() {
        let price = parse_price("25.50").unwrap();
        assert_eq!(price.to_string(), "25.50");
    }

    #[test]
    fn test_parse_price_format_error() {
        assert!(matches!(parse_price("abc"), Err(AppError::Format(_))));
        assert!(matches!(parse_price(""), Err(AppError::Format(_))));
    }

    #[test]
    fn test_parse_price_validation_errors() {
        assert!(matches!(parse_price("0"), Err(AppError::Validation(_))));
        assert!(matches!(parse_price("-5.00"), Err(AppError::Validation(_))));
        assert!(matches!(parse_price("1.999"), Err(AppError::Validation(_))));
    }
}
