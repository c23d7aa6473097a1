//! # Product Repository
//!
//! Reads against the catalog stock projection and the stock updates that
//! keep it in lock-step with the ledger.
//!
//! `stock_quantity` on a product row is a projection of the ledger: the sum
//! of all `quantity_change` values for that product. Every write here is
//! expected to run inside the same transaction as the matching ledger
//! append, which is why the mutating functions take a `&mut SqliteConnection`
//! instead of the pool.
//!
//! The decrement is conditional (`WHERE stock_quantity >= ?`) so that two
//! concurrent sales can never drive a balance negative. A `None` return from
//! [`ProductRepository::decrement_stock`] means the guard rejected the
//! update and the caller should fail its transaction.

use chrono::{DateTime, Utc};
use kasir_core::types::Product;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for product catalog reads and stock-level writes.
#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a product by its primary key.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price, purchase_price, stock_quantity,
                   low_stock_threshold, category_id, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Get a product by SKU.
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price, purchase_price, stock_quantity,
                   low_stock_threshold, category_id, is_active, created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a new product row.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, sku = %product.sku, "inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, price, purchase_price, stock_quantity,
                low_stock_threshold, category_id, is_active, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.price)
        .bind(product.purchase_price)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.category_id)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active products whose stock is at or below their low-stock threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price, purchase_price, stock_quantity,
                   low_stock_threshold, category_id, is_active, created_at, updated_at
            FROM products
            WHERE is_active = 1 AND stock_quantity <= low_stock_threshold
            ORDER BY stock_quantity ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    // -- transaction-scoped operations ---------------------------------------

    /// Fetch a product inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, price, purchase_price, stock_quantity,
                   low_stock_threshold, category_id, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Conditionally subtract `quantity` from a product's stock.
    ///
    /// Returns the new stock level, or `None` when the product was missing
    /// or had fewer than `quantity` units on hand. The guard and the update
    /// are a single statement, so concurrent transactions cannot both pass
    /// the check and oversell.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<Option<i64>> {
        let after: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            RETURNING stock_quantity
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(after)
    }

    /// Add `quantity` back onto a product's stock, returning the new level.
    pub async fn increment_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<i64> {
        let after: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING stock_quantity
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .fetch_optional(&mut *conn)
        .await?;

        after.ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Overwrite a product's stock with an absolute level.
    pub async fn set_stock(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
