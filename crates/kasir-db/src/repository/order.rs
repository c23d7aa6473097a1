//! # Order Repository
//!
//! Persistence for orders, their line-item snapshots, and the per-day
//! order-number counter.
//!
//! Order numbers follow `#YYYYMMDD-NNNN` and reset daily. The counter lives
//! in its own `order_counters` table and is claimed with an upsert that
//! increments and returns in one statement, so concurrent checkouts each get
//! a distinct number. The claim happens inside the checkout transaction: a
//! rolled-back sale may leave a gap in the sequence, but never a duplicate.

use chrono::{DateTime, Utc};
use kasir_core::types::{Order, OrderDetails, OrderItem};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::DbResult;

/// Repository for order reads and transactional order writes.
#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an order by its primary key.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, user_id, customer_id, shift_id,
                   subtotal, discount_amount, tax_amount, total_amount,
                   amount_paid, payment_method, status, notes, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Line items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, product_name, unit_price,
                   purchase_price, quantity, subtotal
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get an order together with its line items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<OrderDetails>> {
        let Some(order) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.get_items(id).await?;
        Ok(Some(OrderDetails { order, items }))
    }

    // -- transaction-scoped operations ---------------------------------------

    /// Claim the next order number for the given instant's calendar day.
    ///
    /// Uses an increment-and-return upsert on `order_counters`, which
    /// serializes concurrent claims on the row's write lock.
    pub async fn next_order_number(
        conn: &mut SqliteConnection,
        now: DateTime<Utc>,
    ) -> DbResult<String> {
        let day = now.format("%Y%m%d").to_string();

        let sequence: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO order_counters (day, last_number)
            VALUES (?1, 1)
            ON CONFLICT(day) DO UPDATE SET last_number = last_number + 1
            RETURNING last_number
            "#,
        )
        .bind(&day)
        .fetch_one(&mut *conn)
        .await?;

        Ok(format!("#{}-{:04}", day, sequence))
    }

    /// Insert an order row inside an open transaction.
    pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, customer_id, shift_id,
                subtotal, discount_amount, tax_amount, total_amount,
                amount_paid, payment_method, status, notes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.user_id)
        .bind(&order.customer_id)
        .bind(&order.shift_id)
        .bind(order.subtotal)
        .bind(order.discount_amount)
        .bind(order.tax_amount)
        .bind(order.total_amount)
        .bind(order.amount_paid)
        .bind(order.payment_method)
        .bind(order.status)
        .bind(&order.notes)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Insert a line-item snapshot inside an open transaction.
    pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id, product_name, unit_price,
                purchase_price, quantity, subtotal
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(&item.product_name)
        .bind(item.unit_price)
        .bind(item.purchase_price)
        .bind(item.quantity)
        .bind(item.subtotal)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Fetch an order inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, order_number, user_id, customer_id, shift_id,
                   subtotal, discount_amount, tax_amount, total_amount,
                   amount_paid, payment_method, status, notes, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(order)
    }

    /// Line items for an order, inside an open transaction.
    pub async fn fetch_items(
        conn: &mut SqliteConnection,
        order_id: &str,
    ) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, product_name, unit_price,
                   purchase_price, quantity, subtotal
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Flip an order from `completed` to `refunded`.
    ///
    /// Returns `false` when the order was not in `completed` status, which
    /// lets a racing second refund lose cleanly.
    pub async fn mark_refunded(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = 'refunded'
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
