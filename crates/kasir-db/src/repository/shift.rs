//! # Shift Repository
//!
//! Cashier shift rows and the per-payment-method order totals used for
//! end-of-shift reconciliation. A partial unique index on
//! `shifts (user_id) WHERE status = 'open'` backs the one-open-shift-per-user
//! rule at the storage level.

use chrono::{DateTime, Utc};
use kasir_core::types::{PaymentBreakdownRow, PaymentMethod, Shift};
use kasir_core::Money;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository for cashier shifts.
#[derive(Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a shift by its primary key.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, user_id, opening_cash, closing_cash, status,
                   started_at, ended_at
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// The open shift for a user, if any.
    pub async fn find_open_by_user(&self, user_id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, user_id, opening_cash, closing_cash, status,
                   started_at, ended_at
            FROM shifts
            WHERE user_id = ?1 AND status = 'open'
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Insert a new open shift.
    pub async fn insert(&self, shift: &Shift) -> DbResult<()> {
        debug!(id = %shift.id, user_id = %shift.user_id, "opening shift");

        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, user_id, opening_cash, closing_cash, status,
                started_at, ended_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.user_id)
        .bind(shift.opening_cash)
        .bind(shift.closing_cash)
        .bind(shift.status)
        .bind(shift.started_at)
        .bind(shift.ended_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // -- transaction-scoped operations ---------------------------------------

    /// Fetch a shift inside an open transaction.
    pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, user_id, opening_cash, closing_cash, status,
                   started_at, ended_at
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(shift)
    }

    /// Close a shift, recording the counted cash.
    ///
    /// Conditional on the shift still being open; returns `false` when a
    /// racing close already won.
    pub async fn close(
        conn: &mut SqliteConnection,
        id: &str,
        closing_cash: Money,
        ended_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET status = 'closed', closing_cash = ?2, ended_at = ?3
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(id)
        .bind(closing_cash)
        .bind(ended_at)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Completed-order counts and totals for a shift, grouped by payment
    /// method. Methods with no orders are absent from the result.
    pub async fn totals_by_method(
        conn: &mut SqliteConnection,
        shift_id: &str,
    ) -> DbResult<Vec<PaymentBreakdownRow>> {
        let rows = sqlx::query_as::<_, (PaymentMethod, i64, Money)>(
            r#"
            SELECT payment_method, COUNT(*), COALESCE(SUM(total_amount), 0)
            FROM orders
            WHERE shift_id = ?1 AND status = 'completed'
            GROUP BY payment_method
            "#,
        )
        .bind(shift_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(method, order_count, total)| PaymentBreakdownRow {
                method,
                order_count,
                total,
            })
            .collect())
    }
}
