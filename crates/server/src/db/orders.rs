//! Order repository for database operations.
//!
//! The `order_product` join table is managed explicitly: replacing an
//! order's product set computes the additions and removals and applies
//! both, rather than deleting and re-inserting everything.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crm_core::{CustomerId, OrderId, ProductId};

use super::RepositoryError;
use crate::models::Order;
use crate::query::{OrderBy, Page, Paging};

/// Fields orders may be ordered by.
pub const ORDER_SORT_FIELDS: &[&str] = &["id", "customer_id", "total_amount", "order_date"];

/// Filters for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<CustomerId>,
    /// Only orders containing this product.
    pub product_id: Option<ProductId>,
    pub total_gte: Option<Decimal>,
    pub total_lte: Option<Decimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
}

/// Internal row type for `PostgreSQL` order queries (without links).
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    total_amount: Decimal,
    order_date: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, product_ids: Vec<ProductId>) -> Order {
        Order {
            id: OrderId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            total_amount: self.total_amount,
            order_date: self.order_date,
            product_ids,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order and its product links in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back and nothing is created.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        order_date: DateTime<Utc>,
        total_amount: Decimal,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError> {
        let raw_ids: Vec<i32> = product_ids.iter().map(ProductId::as_i32).collect();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO customer_order (customer_id, order_date, total_amount)
            VALUES ($1, $2, $3)
            RETURNING id, customer_id, total_amount, order_date
            ",
        )
        .bind(customer_id.as_i32())
        .bind(order_date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO order_product (order_id, product_id)
            SELECT $1, unnest($2::int4[])
            ",
        )
        .bind(row.id)
        .bind(&raw_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut linked: Vec<ProductId> = product_ids.to_vec();
        linked.sort_unstable();
        linked.dedup();
        Ok(row.into_order(linked))
    }

    /// Get an order by its ID, including its linked product IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, total_amount, order_date
            FROM customer_order
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let product_ids = self.product_ids_for(row.id).await?;
        Ok(Some(row.into_order(product_ids)))
    }

    /// Recompute an order's cached total from the current product prices.
    ///
    /// This is the only way a stored total changes after creation; product
    /// price updates never touch it implicitly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn recompute_total(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE customer_order
            SET total_amount = COALESCE(
                (SELECT SUM(p.price)
                 FROM order_product op
                 JOIN product p ON p.id = op.product_id
                 WHERE op.order_id = customer_order.id),
                0)
            WHERE id = $1
            RETURNING id, customer_id, total_amount, order_date
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let product_ids = self.product_ids_for(row.id).await?;
        Ok(row.into_order(product_ids))
    }

    /// Replace an order's product set with an explicit join-table diff.
    ///
    /// Computes the additions and removals against the current links,
    /// applies both, and stores the caller-computed new total, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_products(
        &self,
        id: OrderId,
        target: &[ProductId],
        new_total: Decimal,
    ) -> Result<Order, RepositoryError> {
        let target_set: BTreeSet<i32> = target.iter().map(ProductId::as_i32).collect();

        let mut tx = self.pool.begin().await?;

        // Lock the order row for the duration of the diff
        let exists = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM customer_order WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_i32())
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let current: Vec<i32> =
            sqlx::query_scalar("SELECT product_id FROM order_product WHERE order_id = $1")
                .bind(id.as_i32())
                .fetch_all(&mut *tx)
                .await?;
        let current_set: BTreeSet<i32> = current.into_iter().collect();

        let removals: Vec<i32> = current_set.difference(&target_set).copied().collect();
        let additions: Vec<i32> = target_set.difference(&current_set).copied().collect();

        if !removals.is_empty() {
            sqlx::query("DELETE FROM order_product WHERE order_id = $1 AND product_id = ANY($2)")
                .bind(id.as_i32())
                .bind(&removals)
                .execute(&mut *tx)
                .await?;
        }

        if !additions.is_empty() {
            sqlx::query(
                r"
                INSERT INTO order_product (order_id, product_id)
                SELECT $1, unnest($2::int4[])
                ",
            )
            .bind(id.as_i32())
            .bind(&additions)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE customer_order
            SET total_amount = $1
            WHERE id = $2
            RETURNING id, customer_id, total_amount, order_date
            ",
        )
        .bind(new_total)
        .bind(id.as_i32())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let linked: Vec<ProductId> = target_set.into_iter().map(ProductId::new).collect();
        Ok(row.into_order(linked))
    }

    /// List orders with optional filtering, ordering, and pagination.
    ///
    /// Linked product IDs are gathered with one extra query for the page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &OrderFilter,
        order: &OrderBy,
        paging: Paging,
    ) -> Result<Page<Order>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, customer_id, total_amount, order_date FROM customer_order WHERE TRUE",
        );

        if let Some(customer_id) = filter.customer_id {
            qb.push(" AND customer_id = ");
            qb.push_bind(customer_id.as_i32());
        }
        if let Some(product_id) = filter.product_id {
            qb.push(
                " AND EXISTS (SELECT 1 FROM order_product op \
                 WHERE op.order_id = customer_order.id AND op.product_id = ",
            );
            qb.push_bind(product_id.as_i32());
            qb.push(")");
        }
        if let Some(total) = filter.total_gte {
            qb.push(" AND total_amount >= ");
            qb.push_bind(total);
        }
        if let Some(total) = filter.total_lte {
            qb.push(" AND total_amount <= ");
            qb.push_bind(total);
        }
        if let Some(date) = filter.order_date_gte {
            qb.push(" AND order_date >= ");
            qb.push_bind(date);
        }
        if let Some(date) = filter.order_date_lte {
            qb.push(" AND order_date <= ");
            qb.push_bind(date);
        }

        qb.push(" ORDER BY ");
        qb.push(order.to_sql());
        qb.push(" LIMIT ");
        qb.push_bind(paging.limit + 1);
        qb.push(" OFFSET ");
        qb.push_bind(paging.offset);

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(self.pool).await?;

        let order_ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut links = self.product_ids_for_orders(&order_ids).await?;

        let orders = rows
            .into_iter()
            .map(|row| {
                let product_ids = links.remove(&row.id).unwrap_or_default();
                row.into_order(product_ids)
            })
            .collect();

        Ok(Page::from_rows(orders, paging))
    }

    /// Linked product IDs for one order.
    async fn product_ids_for(&self, order_id: i32) -> Result<Vec<ProductId>, RepositoryError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            r"
            SELECT product_id
            FROM order_product
            WHERE order_id = $1
            ORDER BY product_id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ids.into_iter().map(ProductId::new).collect())
    }

    /// Linked product IDs for a batch of orders, grouped by order.
    async fn product_ids_for_orders(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<ProductId>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i32)> = sqlx::query_as(
            r"
            SELECT order_id, product_id
            FROM order_product
            WHERE order_id = ANY($1)
            ORDER BY order_id ASC, product_id ASC
            ",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut links: HashMap<i32, Vec<ProductId>> = HashMap::new();
        for (order_id, product_id) in rows {
            links
                .entry(order_id)
                .or_default()
                .push(ProductId::new(product_id));
        }

        Ok(links)
    }
}
