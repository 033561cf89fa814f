//! Customer API handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::db::{CustomerFilter, CustomerRepository, customers::CUSTOMER_SORT_FIELDS};
use crate::error::AppError;
use crate::models::Customer;
use crate::query::{OrderBy, Page, PageParams};
use crate::services::{self, BulkCreateResult, CreateCustomerInput};
use crate::state::AppState;

/// Build the customers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", post(create_customer).get(list_customers))
        .route("/customers/bulk", post(bulk_create_customers))
}

/// Response for a single customer creation.
#[derive(Debug, Serialize)]
pub struct CreateCustomerResponse {
    pub customer: Customer,
    pub message: String,
}

/// Create a customer.
///
/// # Errors
///
/// Returns `Validation` for a malformed email or phone, `Duplicate` for a
/// taken email.
async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> Result<(StatusCode, Json<CreateCustomerResponse>), AppError> {
    let customer = services::create_customer(state.pool(), input).await?;
    tracing::info!(customer_id = %customer.id, "customer created");

    Ok((
        StatusCode::CREATED,
        Json(CreateCustomerResponse {
            customer,
            message: "Customer created successfully".to_string(),
        }),
    ))
}

/// Request body for bulk customer creation.
#[derive(Debug, Deserialize)]
pub struct BulkCreateCustomersRequest {
    pub inputs: Vec<CreateCustomerInput>,
}

/// Create customers in bulk.
///
/// Always returns 200: per-row failures are reported in the `errors` list
/// rather than failing the request.
async fn bulk_create_customers(
    State(state): State<AppState>,
    Json(body): Json<BulkCreateCustomersRequest>,
) -> Result<Json<BulkCreateResult>, AppError> {
    let result = services::bulk_create_customers(state.pool(), body.inputs).await?;
    tracing::info!(
        created = result.customers.len(),
        failed = result.errors.len(),
        "bulk customer creation finished"
    );

    Ok(Json(result))
}

/// Query parameters for customer listings.
#[derive(Debug, Deserialize)]
struct ListCustomersParams {
    name_contains: Option<String>,
    email_contains: Option<String>,
    phone_contains: Option<String>,
    order_by: Option<String>,
    first: Option<i64>,
    after: Option<String>,
}

/// List customers with optional filtering, ordering, and pagination.
async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListCustomersParams>,
) -> Result<Json<Page<Customer>>, AppError> {
    let order = OrderBy::parse(params.order_by.as_deref(), CUSTOMER_SORT_FIELDS)?;
    let paging = PageParams {
        first: params.first,
        after: params.after,
    }
    .resolve()?;

    let filter = CustomerFilter {
        name_contains: params.name_contains,
        email_contains: params.email_contains,
        phone_contains: params.phone_contains,
    };

    let page = CustomerRepository::new(state.pool())
        .list(&filter, &order, paging)
        .await?;

    Ok(Json(page))
}
