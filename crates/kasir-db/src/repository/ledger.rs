//! # Stock Ledger Repository
//!
//! The `inventory_logs` table is append-only: entries are inserted, never
//! updated or deleted, so the sequence for a product is a complete audit
//! trail of how its stock level came to be. Each entry carries both the
//! signed `quantity_change` and the resulting `quantity_after`, which makes
//! the history readable without replaying it from the start.

use chrono::{DateTime, Utc};
use kasir_core::types::{MovementType, StockLedgerEntry};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::DbResult;

/// Repository for the append-only stock movement ledger.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Movement history for a product, newest first.
    pub async fn history_for_product(
        &self,
        product_id: &str,
        limit: i64,
    ) -> DbResult<Vec<StockLedgerEntry>> {
        let entries = sqlx::query_as::<_, StockLedgerEntry>(
            r#"
            SELECT id, product_id, user_id, supplier_id, type, quantity_change,
                   quantity_after, reference_number, notes, status, created_at
            FROM inventory_logs
            WHERE product_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries that share a reference number (e.g. all lines of one order).
    pub async fn find_by_reference(&self, reference: &str) -> DbResult<Vec<StockLedgerEntry>> {
        let entries = sqlx::query_as::<_, StockLedgerEntry>(
            r#"
            SELECT id, product_id, user_id, supplier_id, type, quantity_change,
                   quantity_after, reference_number, notes, status, created_at
            FROM inventory_logs
            WHERE reference_number = ?1
            ORDER BY rowid
            "#,
        )
        .bind(reference)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Sum of all signed movements for a product.
    ///
    /// For a product created with zero stock this equals its current
    /// `stock_quantity`; the two are maintained in the same transactions.
    pub async fn net_change_for_product(&self, product_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity_change), 0)
            FROM inventory_logs
            WHERE product_id = ?1
            "#,
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // -- transaction-scoped operations ---------------------------------------

    /// Append a movement entry inside an open transaction.
    ///
    /// Builds the row (fresh UUID, `completed` status) and returns it so the
    /// caller can hand it back without a second read.
    #[allow(clippy::too_many_arguments)]
    pub async fn record_movement(
        conn: &mut SqliteConnection,
        product_id: &str,
        user_id: &str,
        supplier_id: Option<&str>,
        movement: MovementType,
        quantity_change: i64,
        quantity_after: i64,
        reference_number: &str,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<StockLedgerEntry> {
        let entry = StockLedgerEntry {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            user_id: user_id.to_string(),
            supplier_id: supplier_id.map(str::to_string),
            movement,
            quantity_change,
            quantity_after,
            reference_number: Some(reference_number.to_string()),
            notes: notes.map(str::to_string),
            status: "completed".to_string(),
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_logs (
                id, product_id, user_id, supplier_id, type, quantity_change,
                quantity_after, reference_number, notes, status, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.product_id)
        .bind(&entry.user_id)
        .bind(&entry.supplier_id)
        .bind(entry.movement)
        .bind(entry.quantity_change)
        .bind(entry.quantity_after)
        .bind(&entry.reference_number)
        .bind(&entry.notes)
        .bind(&entry.status)
        .bind(entry.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(entry)
    }
}
