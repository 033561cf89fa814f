//! Customer mutations.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crm_core::{Email, Phone};

use crate::db::{CustomerRepository, RepositoryError};
use crate::error::AppError;
use crate::models::Customer;

/// Typed input for creating one customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Result of a bulk customer creation: the rows that succeeded and the
/// per-row errors for the rows that didn't, both in input order.
#[derive(Debug, Serialize)]
pub struct BulkCreateResult {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

/// Create a single customer.
///
/// # Errors
///
/// Returns `Validation` for a malformed email or phone, `Duplicate` if the
/// email is already taken, or an internal error if persistence fails.
pub async fn create_customer(
    pool: &PgPool,
    input: CreateCustomerInput,
) -> Result<Customer, AppError> {
    let email = Email::parse(&input.email)
        .map_err(|_| AppError::Validation("Invalid email format".to_string()))?;

    let repo = CustomerRepository::new(pool);
    if repo.email_exists(&email).await? {
        return Err(AppError::Duplicate("Email already exists".to_string()));
    }

    let phone = input
        .phone
        .as_deref()
        .map(Phone::parse)
        .transpose()
        .map_err(|_| {
            AppError::Validation(
                "Invalid phone format. Use +1234567890 or 123-456-7890".to_string(),
            )
        })?;

    // The unique index closes the check-then-insert race; a concurrent
    // insert surfaces as Conflict here.
    let customer = repo.insert(&input.name, &email, phone.as_ref()).await?;
    Ok(customer)
}

/// Create customers in bulk with per-row error isolation.
///
/// Rows are processed in input order. A failing row records a
/// human-readable error tagged with its 1-based row number and processing
/// continues; successful rows are persisted immediately and are never
/// rolled back by later failures. Partial success is the contract, so no
/// enclosing transaction is used.
///
/// # Errors
///
/// Returns an internal error only if the database itself fails; all
/// validation and uniqueness failures are reported per row.
pub async fn bulk_create_customers(
    pool: &PgPool,
    inputs: Vec<CreateCustomerInput>,
) -> Result<BulkCreateResult, AppError> {
    let repo = CustomerRepository::new(pool);
    let mut customers = Vec::new();
    let mut errors = Vec::new();

    for (idx, input) in inputs.iter().enumerate() {
        let row = idx + 1;

        // Same check order as single creation: email format, uniqueness,
        // then phone format.
        let Ok(email) = Email::parse(&input.email) else {
            errors.push(row_error(row, "Invalid email format"));
            continue;
        };

        if repo.email_exists(&email).await? {
            errors.push(row_error(row, "Email already exists"));
            continue;
        }

        let phone = match input.phone.as_deref().map(Phone::parse).transpose() {
            Ok(phone) => phone,
            Err(_) => {
                errors.push(row_error(row, "Invalid phone format"));
                continue;
            }
        };

        match repo.insert(&input.name, &email, phone.as_ref()).await {
            Ok(customer) => customers.push(customer),
            // Lost a race within the batch; report it like any duplicate
            Err(RepositoryError::Conflict(_)) => {
                errors.push(row_error(row, "Email already exists"));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(BulkCreateResult { customers, errors })
}

fn row_error(row: usize, message: &str) -> String {
    format!("Row {row}: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_format() {
        assert_eq!(
            row_error(2, "Email already exists"),
            "Row 2: Email already exists"
        );
        assert_eq!(row_error(10, "Invalid email format"), "Row 10: Invalid email format");
    }
}
