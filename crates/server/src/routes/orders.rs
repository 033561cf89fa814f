//! Order API handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crm_core::{CustomerId, OrderId, ProductId};

use crate::db::{OrderFilter, OrderRepository, orders::ORDER_SORT_FIELDS};
use crate::error::AppError;
use crate::models::Order;
use crate::query::{OrderBy, Page, PageParams};
use crate::services::{self, CreateOrderInput};
use crate::state::AppState;

/// Build the orders router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/{id}/total", post(recompute_order_total))
        .route("/orders/{id}/products", put(set_order_products))
}

/// Response wrapping a single order mutation.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub order: Order,
    pub message: String,
}

/// Create an order.
///
/// # Errors
///
/// Returns `NotFound` if the customer or any product ID does not resolve,
/// `Validation` if the product list is empty.
async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = services::create_order(state.pool(), input).await?;
    tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            order,
            message: "Order created successfully".to_string(),
        }),
    ))
}

/// Recompute an order's cached total from current product prices.
///
/// Totals never refresh implicitly; this endpoint is the only trigger.
async fn recompute_order_total(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = services::recompute_order_total(state.pool(), id).await?;
    tracing::info!(order_id = %order.id, total = %order.total_amount, "order total recomputed");

    Ok(Json(OrderResponse {
        order,
        message: "Order total recomputed successfully".to_string(),
    }))
}

/// Request body for replacing an order's product set.
#[derive(Debug, Deserialize)]
pub struct SetOrderProductsRequest {
    pub product_ids: Vec<ProductId>,
}

/// Replace an order's product set via an explicit join-table diff.
async fn set_order_products(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(body): Json<SetOrderProductsRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = services::set_order_products(state.pool(), id, body.product_ids).await?;
    tracing::info!(order_id = %order.id, "order products replaced");

    Ok(Json(OrderResponse {
        order,
        message: "Order products updated successfully".to_string(),
    }))
}

/// Query parameters for order listings.
#[derive(Debug, Deserialize)]
struct ListOrdersParams {
    customer_id: Option<CustomerId>,
    product_id: Option<ProductId>,
    total_gte: Option<Decimal>,
    total_lte: Option<Decimal>,
    order_date_gte: Option<DateTime<Utc>>,
    order_date_lte: Option<DateTime<Utc>>,
    order_by: Option<String>,
    first: Option<i64>,
    after: Option<String>,
}

/// List orders with optional filtering, ordering, and pagination.
async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<Page<Order>>, AppError> {
    let order_by = OrderBy::parse(params.order_by.as_deref(), ORDER_SORT_FIELDS)?;
    let paging = PageParams {
        first: params.first,
        after: params.after,
    }
    .resolve()?;

    let filter = OrderFilter {
        customer_id: params.customer_id,
        product_id: params.product_id,
        total_gte: params.total_gte,
        total_lte: params.total_lte,
        order_date_gte: params.order_date_gte,
        order_date_lte: params.order_date_lte,
    };

    let page = OrderRepository::new(state.pool())
        .list(&filter, &order_by, paging)
        .await?;

    Ok(Json(page))
}
