//! # Shift Service
//!
//! Cashier shift lifecycle and end-of-shift cash reconciliation.
//!
//! A shift brackets a cashier's session: it opens with a counted float
//! (`opening_cash`) and closes with the counted drawer (`closing_cash`).
//! Closing sums the shift's completed orders per payment method and reports
//!
//! ```text
//! expected_cash   = opening_cash + Σ(cash-method order totals)
//! cash_difference = closing_cash − expected_cash
//! ```
//!
//! so a short drawer shows up as a negative difference. Card and e-wallet
//! totals appear in the breakdown but never move the cash expectation.

use chrono::Utc;
use kasir_core::types::{
    PaymentBreakdownRow, PaymentMethod, Shift, ShiftStatus, ShiftSummary,
};
use kasir_core::validation::validate_non_negative;
use kasir_core::Money;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::shift::ShiftRepository;
use crate::service::error::{ServiceError, ServiceResult};

/// Service for shift lifecycle and reconciliation.
#[derive(Clone)]
pub struct ShiftService {
    pool: SqlitePool,
}

impl ShiftService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a shift for a user with a counted opening float.
    ///
    /// One open shift per user: a second open fails with Conflict. The
    /// partial unique index on open shifts backstops the pre-check, so a
    /// racing pair of opens cannot both land.
    pub async fn open_shift(&self, user_id: &str, opening_cash: Money) -> ServiceResult<Shift> {
        validate_non_negative("opening_cash", opening_cash)?;

        let repo = ShiftRepository::new(self.pool.clone());
        if repo.find_open_by_user(user_id).await?.is_some() {
            return Err(ServiceError::conflict(format!(
                "User {} already has an open shift",
                user_id
            )));
        }

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            opening_cash,
            closing_cash: None,
            status: ShiftStatus::Open,
            started_at: Utc::now(),
            ended_at: None,
        };

        match repo.insert(&shift).await {
            Ok(()) => {}
            Err(err) if err.is_unique_violation() => {
                return Err(ServiceError::conflict(format!(
                    "User {} already has an open shift",
                    user_id
                )));
            }
            Err(err) => return Err(err.into()),
        }

        info!(shift_id = %shift.id, user_id, opening_cash = %opening_cash, "shift opened");

        Ok(shift)
    }

    /// Close a shift and reconcile the drawer.
    ///
    /// Only the owning user may close their shift; closing an already-closed
    /// shift is a Conflict. The totals are read in the same transaction as
    /// the status flip, so the summary reflects exactly the orders the shift
    /// closed with.
    pub async fn close_shift(
        &self,
        shift_id: &str,
        user_id: &str,
        closing_cash: Money,
    ) -> ServiceResult<ShiftSummary> {
        validate_non_negative("closing_cash", closing_cash)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let mut shift = ShiftRepository::fetch(&mut tx, shift_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Shift", shift_id))?;

        if shift.user_id != user_id {
            return Err(ServiceError::conflict(
                "Shift belongs to another user".to_string(),
            ));
        }

        if shift.status != ShiftStatus::Open {
            return Err(ServiceError::conflict("Shift is already closed".to_string()));
        }

        let breakdown = ShiftRepository::totals_by_method(&mut tx, shift_id).await?;

        let closed = ShiftRepository::close(&mut tx, shift_id, closing_cash, now).await?;
        if !closed {
            return Err(ServiceError::conflict("Shift is already closed".to_string()));
        }

        tx.commit().await.map_err(DbError::from)?;

        shift.status = ShiftStatus::Closed;
        shift.closing_cash = Some(closing_cash);
        shift.ended_at = Some(now);

        let summary = build_summary(shift, breakdown);

        info!(
            shift_id,
            expected_cash = %summary.expected_cash,
            cash_difference = %summary.cash_difference,
            "shift closed"
        );

        Ok(summary)
    }

    /// The user's currently open shift, if any.
    pub async fn current_shift(&self, user_id: &str) -> ServiceResult<Option<Shift>> {
        let shift = ShiftRepository::new(self.pool.clone())
            .find_open_by_user(user_id)
            .await?;
        Ok(shift)
    }

    /// Reconciliation summary for any shift, open or closed.
    ///
    /// For an open shift the counted cash is taken as zero, so the
    /// difference reads as the full expected amount short.
    pub async fn shift_summary(&self, shift_id: &str) -> ServiceResult<ShiftSummary> {
        let repo = ShiftRepository::new(self.pool.clone());
        let shift = repo
            .get_by_id(shift_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Shift", shift_id))?;

        let mut conn = self.pool.acquire().await.map_err(DbError::from)?;
        let breakdown = ShiftRepository::totals_by_method(&mut conn, shift_id).await?;

        Ok(build_summary(shift, breakdown))
    }
}

/// Assemble a summary: fill in zero rows for unused payment methods, then
/// derive the cash expectation and difference.
fn build_summary(shift: Shift, rows: Vec<PaymentBreakdownRow>) -> ShiftSummary {
    let payment_breakdown: Vec<PaymentBreakdownRow> = PaymentMethod::ALL
        .iter()
        .map(|&method| {
            rows.iter()
                .find(|row| row.method == method)
                .cloned()
                .unwrap_or(PaymentBreakdownRow {
                    method,
                    order_count: 0,
                    total: Money::zero(),
                })
        })
        .collect();

    let total_orders = payment_breakdown.iter().map(|row| row.order_count).sum();
    let total_sales = payment_breakdown
        .iter()
        .map(|row| row.total)
        .sum::<Money>();
    let cash_sales = payment_breakdown
        .iter()
        .find(|row| row.method == PaymentMethod::Cash)
        .map(|row| row.total)
        .unwrap_or_else(Money::zero);

    let expected_cash = shift.opening_cash + cash_sales;
    let actual_cash = shift.closing_cash.unwrap_or_else(Money::zero);
    let cash_difference = actual_cash - expected_cash;

    ShiftSummary {
        shift,
        total_orders,
        total_sales,
        payment_breakdown,
        expected_cash,
        actual_cash,
        cash_difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn shift(opening: i64, closing: Option<i64>) -> Shift {
        Shift {
            id: "shift-1".to_string(),
            user_id: "user-1".to_string(),
            opening_cash: Money::from_minor(opening),
            closing_cash: closing.map(Money::from_minor),
            status: if closing.is_some() {
                ShiftStatus::Closed
            } else {
                ShiftStatus::Open
            },
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn test_summary_short_drawer() {
        let rows = vec![PaymentBreakdownRow {
            method: PaymentMethod::Cash,
            order_count: 3,
            total: Money::from_minor(120_000),
        }];

        let summary = build_summary(shift(50_000, Some(165_000)), rows);

        assert_eq!(summary.expected_cash, Money::from_minor(170_000));
        assert_eq!(summary.cash_difference, Money::from_minor(-5_000));
        assert_eq!(summary.total_orders, 3);
    }

    #[test]
    fn test_summary_non_cash_does_not_move_expectation() {
        let rows = vec![PaymentBreakdownRow {
            method: PaymentMethod::Card,
            order_count: 2,
            total: Money::from_minor(90_000),
        }];

        let summary = build_summary(shift(50_000, Some(50_000)), rows);

        assert_eq!(summary.expected_cash, Money::from_minor(50_000));
        assert_eq!(summary.cash_difference, Money::zero());
        assert_eq!(summary.total_sales, Money::from_minor(90_000));
    }

    #[test]
    fn test_summary_fills_all_methods() {
        let summary = build_summary(shift(10_000, None), Vec::new());

        assert_eq!(summary.payment_breakdown.len(), PaymentMethod::ALL.len());
        assert!(summary
            .payment_breakdown
            .iter()
            .all(|row| row.order_count == 0 && row.total.is_zero()));
    }

    use crate::pool::{Database, DbConfig};
    use crate::service::order::{CreateOrder, OrderLine};
    use kasir_core::types::{Product, TaxRate};
    use kasir_core::CoreError;

    async fn setup() -> Database {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    async fn seed_product(db: &Database, id: &str, price: i64, stock: i64) {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: id.to_string(),
                sku: format!("SKU-{}", id.to_uppercase()),
                name: format!("Product {}", id),
                price: Money::from_minor(price),
                purchase_price: Money::from_minor(price / 2),
                stock_quantity: stock,
                low_stock_threshold: 5,
                category_id: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("seed product");
    }

    async fn place_order(
        db: &Database,
        shift_id: &str,
        product_id: &str,
        quantity: i64,
        method: PaymentMethod,
    ) {
        db.order_service()
            .create_order(CreateOrder {
                user_id: "cashier-1".to_string(),
                items: vec![OrderLine {
                    product_id: product_id.to_string(),
                    quantity,
                }],
                payment_method: method,
                discount_amount: Money::zero(),
                tax_rate: TaxRate::zero(),
                amount_paid: Money::from_minor(1_000_000),
                customer_id: None,
                shift_id: Some(shift_id.to_string()),
                notes: None,
            })
            .await
            .expect("order");
    }

    #[tokio::test]
    async fn test_open_shift_unique_index_rejects_bypassed_precheck() {
        let db = setup().await;
        db.shift_service()
            .open_shift("cashier-1", Money::zero())
            .await
            .unwrap();

        // Insert straight through the repository, skipping the service's
        // open-shift lookup: the partial unique index alone must reject a
        // second open row for the same user.
        let err = db
            .shifts()
            .insert(&Shift {
                id: "shift-2".to_string(),
                user_id: "cashier-1".to_string(),
                opening_cash: Money::zero(),
                closing_cash: None,
                status: ShiftStatus::Open,
                started_at: Utc::now(),
                ended_at: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_racing_opens_yield_one_shift_and_a_conflict() {
        let db = setup().await;
        let service = db.shift_service();

        let (first, second) = tokio::join!(
            service.open_shift("cashier-1", Money::zero()),
            service.open_shift("cashier-1", Money::zero())
        );

        let (winner, loser) = match (first, second) {
            (Ok(shift), Err(err)) | (Err(err), Ok(shift)) => (shift, err),
            other => panic!("expected exactly one open to win: {other:?}"),
        };
        assert_eq!(winner.status, ShiftStatus::Open);

        // Whether the loser trips the lookup or the unique-index fallback,
        // the caller sees a business conflict, never a storage error.
        assert!(matches!(loser, ServiceError::Core(CoreError::Conflict(_))));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shifts WHERE user_id = 'cashier-1'")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_second_open_shift_is_a_conflict() {
        let db = setup().await;
        let service = db.shift_service();

        let shift = service
            .open_shift("cashier-1", Money::from_minor(50_000))
            .await
            .unwrap();
        assert_eq!(shift.status, ShiftStatus::Open);

        let err = service
            .open_shift("cashier-1", Money::from_minor(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));

        // A different user is unaffected.
        assert!(service
            .open_shift("cashier-2", Money::zero())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_close_shift_reconciles_the_drawer() {
        let db = setup().await;
        seed_product(&db, "p1", 70_000, 50).await;
        seed_product(&db, "p2", 50_000, 50).await;
        seed_product(&db, "p3", 30_000, 50).await;

        let service = db.shift_service();
        let shift = service
            .open_shift("cashier-1", Money::from_minor(50_000))
            .await
            .unwrap();

        place_order(&db, &shift.id, "p1", 1, PaymentMethod::Cash).await;
        place_order(&db, &shift.id, "p2", 1, PaymentMethod::Cash).await;
        place_order(&db, &shift.id, "p3", 1, PaymentMethod::Card).await;

        let summary = service
            .close_shift(&shift.id, "cashier-1", Money::from_minor(165_000))
            .await
            .unwrap();

        // Cash only: 50_000 + 120_000 expected; drawer counted 165_000.
        assert_eq!(summary.expected_cash, Money::from_minor(170_000));
        assert_eq!(summary.cash_difference, Money::from_minor(-5_000));
        assert_eq!(summary.total_orders, 3);
        assert_eq!(summary.total_sales, Money::from_minor(150_000));
        assert_eq!(summary.method_total(PaymentMethod::Card), Money::from_minor(30_000));
        assert_eq!(summary.shift.status, ShiftStatus::Closed);
    }

    #[tokio::test]
    async fn test_refunded_orders_do_not_count_toward_shift_totals() {
        let db = setup().await;
        seed_product(&db, "p1", 70_000, 50).await;

        let service = db.shift_service();
        let shift = service
            .open_shift("cashier-1", Money::zero())
            .await
            .unwrap();

        place_order(&db, &shift.id, "p1", 1, PaymentMethod::Cash).await;
        place_order(&db, &shift.id, "p1", 1, PaymentMethod::Cash).await;

        let orders: Vec<String> = sqlx::query_scalar("SELECT id FROM orders ORDER BY rowid")
            .fetch_all(db.pool())
            .await
            .unwrap();
        db.order_service()
            .refund_order(&orders[0], "manager-1")
            .await
            .unwrap();

        let summary = service
            .close_shift(&shift.id, "cashier-1", Money::from_minor(70_000))
            .await
            .unwrap();
        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.expected_cash, Money::from_minor(70_000));
        assert_eq!(summary.cash_difference, Money::zero());
    }

    #[tokio::test]
    async fn test_close_shift_ownership_and_single_close() {
        let db = setup().await;
        let service = db.shift_service();
        let shift = service
            .open_shift("cashier-1", Money::zero())
            .await
            .unwrap();

        let err = service
            .close_shift(&shift.id, "cashier-2", Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));

        service
            .close_shift(&shift.id, "cashier-1", Money::zero())
            .await
            .unwrap();

        let err = service
            .close_shift(&shift.id, "cashier-1", Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Conflict(_))));

        // Closed shift frees the user to open a new one.
        assert!(service.current_shift("cashier-1").await.unwrap().is_none());
        assert!(service
            .open_shift("cashier-1", Money::zero())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unknown_shift_is_not_found() {
        let db = setup().await;

        let err = db
            .shift_service()
            .close_shift("missing", "cashier-1", Money::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));

        let err = db.shift_service().shift_summary("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));
    }
}
