//! Customer repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crm_core::{CustomerId, Email, Phone};

use super::RepositoryError;
use crate::models::Customer;
use crate::query::{OrderBy, Page, Paging, escape_like};

/// Fields customers may be ordered by.
pub const CUSTOMER_SORT_FIELDS: &[&str] = &["id", "name", "email", "created_at"];

/// Substring filters for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub name_contains: Option<String>,
    pub email_contains: Option<String>,
    pub phone_contains: Option<String>,
}

/// Internal row type for `PostgreSQL` customer queries.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    name: String,
    email: String,
    phone: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let phone = row
            .phone
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
            })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            email,
            phone,
            created_at: row.created_at,
        })
    }
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a customer with this email already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM customer WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Get a customer by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, phone, created_at
            FROM customer
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        &self,
        name: &str,
        email: &Email,
        phone: Option<&Phone>,
    ) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customer (name, email, phone)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, phone, created_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(phone.map(Phone::as_str))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("Email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// List customers with optional filtering, ordering, and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
        order: &OrderBy,
        paging: Paging,
    ) -> Result<Page<Customer>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, name, email, phone, created_at FROM customer WHERE TRUE");

        if let Some(name) = &filter.name_contains {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(name)));
        }
        if let Some(email) = &filter.email_contains {
            qb.push(" AND email ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(email)));
        }
        if let Some(phone) = &filter.phone_contains {
            qb.push(" AND phone ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(phone)));
        }

        qb.push(" ORDER BY ");
        qb.push(order.to_sql());
        qb.push(" LIMIT ");
        qb.push_bind(paging.limit + 1);
        qb.push(" OFFSET ");
        qb.push_bind(paging.offset);

        let rows: Vec<CustomerRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let customers = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::from_rows(customers, paging))
    }
}
