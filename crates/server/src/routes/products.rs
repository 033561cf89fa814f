//! Product API handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{ProductFilter, ProductRepository, products::PRODUCT_SORT_FIELDS};
use crate::error::AppError;
use crate::models::Product;
use crate::query::{OrderBy, Page, PageParams};
use crate::services::{self, CreateProductInput};
use crate::state::AppState;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/products", post(create_product).get(list_products))
}

/// Response for a product creation.
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub product: Product,
    pub message: String,
}

/// Create a product.
///
/// # Errors
///
/// Returns `Format` for an unparsable price string, `Validation` for a
/// non-positive price or negative stock.
async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<(StatusCode, Json<CreateProductResponse>), AppError> {
    let product = services::create_product(state.pool(), input).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            product,
            message: "Product created successfully".to_string(),
        }),
    ))
}

/// Query parameters for product listings.
#[derive(Debug, Deserialize)]
struct ListProductsParams {
    name_contains: Option<String>,
    price_gte: Option<Decimal>,
    price_lte: Option<Decimal>,
    stock_gte: Option<i32>,
    stock_lte: Option<i32>,
    order_by: Option<String>,
    first: Option<i64>,
    after: Option<String>,
}

/// List products with optional filtering, ordering, and pagination.
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<Page<Product>>, AppError> {
    let order = OrderBy::parse(params.order_by.as_deref(), PRODUCT_SORT_FIELDS)?;
    let paging = PageParams {
        first: params.first,
        after: params.after,
    }
    .resolve()?;

    let filter = ProductFilter {
        name_contains: params.name_contains,
        price_gte: params.price_gte,
        price_lte: params.price_lte,
        stock_gte: params.stock_gte,
        stock_lte: params.stock_lte,
    };

    let page = ProductRepository::new(state.pool())
        .list(&filter, &order, paging)
        .await?;

    Ok(Json(page))
}
