//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crm_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::Product;
use crate::query::{OrderBy, Page, Paging, escape_like};

/// Fields products may be ordered by.
pub const PRODUCT_SORT_FIELDS: &[&str] = &["id", "name", "price", "stock", "created_at"];

/// Filters for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name_contains: Option<String>,
    pub price_gte: Option<Decimal>,
    pub price_lte: Option<Decimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
}

/// Internal row type for `PostgreSQL` product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    stock: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::try_from_decimal(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            stock: row.stock,
            price,
            created_at: row.created_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        price: Price,
        stock: i32,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO product (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, stock, price, created_at
            ",
        )
        .bind(name)
        .bind(description)
        .bind(price.amount())
        .bind(stock)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Resolve a set of product IDs to products.
    ///
    /// Returns only the products that exist; callers compare the result
    /// count against the requested count to detect unknown IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();

        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, name, description, stock, price, created_at
            FROM product
            WHERE id = ANY($1)
            ORDER BY id ASC
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List products with optional filtering, ordering, and pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        order: &OrderBy,
        paging: Paging,
    ) -> Result<Page<Product>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, name, description, stock, price, created_at FROM product WHERE TRUE",
        );

        if let Some(name) = &filter.name_contains {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(name)));
        }
        if let Some(price) = filter.price_gte {
            qb.push(" AND price >= ");
            qb.push_bind(price);
        }
        if let Some(price) = filter.price_lte {
            qb.push(" AND price <= ");
            qb.push_bind(price);
        }
        if let Some(stock) = filter.stock_gte {
            qb.push(" AND stock >= ");
            qb.push_bind(stock);
        }
        if let Some(stock) = filter.stock_lte {
            qb.push(" AND stock <= ");
            qb.push_bind(stock);
        }

        qb.push(" ORDER BY ");
        qb.push(order.to_sql());
        qb.push(" LIMIT ");
        qb.push_bind(paging.limit + 1);
        qb.push(" OFFSET ");
        qb.push_bind(paging.offset);

        let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(self.pool).await?;
        let products = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::from_rows(products, paging))
    }
}
