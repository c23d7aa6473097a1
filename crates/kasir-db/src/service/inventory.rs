//! # Inventory Service
//!
//! Manual stock movements: deliveries in, spoilage/transfers out, and
//! physical-count adjustments. Each operation is one transaction over one
//! product and appends exactly one ledger entry.
//!
//! Every movement gets a human reference number, `SI-`/`SO-`/`ADJ-` plus
//! the date and a random suffix, e.g. `SI-20250114-3F82A1`. Unlike order
//! numbers these are not sequential; they only need to be readable and
//! unique enough to quote on paperwork.

use chrono::{DateTime, Utc};
use kasir_core::types::{MovementType, Product, StockLedgerEntry};
use kasir_core::validation::validate_quantity;
use kasir_core::ValidationError;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::ledger::LedgerRepository;
use crate::repository::product::ProductRepository;
use crate::service::error::{ServiceError, ServiceResult};

/// Service for manual stock operations and movement history.
#[derive(Clone)]
pub struct InventoryService {
    pool: SqlitePool,
}

impl InventoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an incoming delivery: add `quantity` units of a product.
    pub async fn stock_in(
        &self,
        product_id: &str,
        user_id: &str,
        quantity: i64,
        supplier_id: Option<&str>,
        notes: Option<&str>,
    ) -> ServiceResult<StockLedgerEntry> {
        validate_quantity(quantity)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let product = ProductRepository::fetch(&mut tx, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        let quantity_after =
            ProductRepository::increment_stock(&mut tx, &product.id, quantity, now).await?;

        let entry = LedgerRepository::record_movement(
            &mut tx,
            &product.id,
            user_id,
            supplier_id,
            MovementType::StockIn,
            quantity,
            quantity_after,
            &reference_number("SI", now),
            notes,
            now,
        )
        .await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            product = %product.name,
            quantity,
            quantity_after,
            reference = entry.reference_number.as_deref().unwrap_or(""),
            "stock in"
        );

        Ok(entry)
    }

    /// Record an outgoing movement: subtract `quantity` units.
    ///
    /// Fails with InsufficientStock rather than driving the level negative.
    pub async fn stock_out(
        &self,
        product_id: &str,
        user_id: &str,
        quantity: i64,
        notes: Option<&str>,
    ) -> ServiceResult<StockLedgerEntry> {
        validate_quantity(quantity)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let product = ProductRepository::fetch(&mut tx, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        let quantity_after =
            ProductRepository::decrement_stock(&mut tx, &product.id, quantity, now)
                .await?
                .ok_or_else(|| {
                    ServiceError::insufficient_stock(
                        &product.name,
                        product.stock_quantity,
                        quantity,
                    )
                })?;

        let entry = LedgerRepository::record_movement(
            &mut tx,
            &product.id,
            user_id,
            None,
            MovementType::StockOut,
            -quantity,
            quantity_after,
            &reference_number("SO", now),
            notes,
            now,
        )
        .await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            product = %product.name,
            quantity,
            quantity_after,
            reference = entry.reference_number.as_deref().unwrap_or(""),
            "stock out"
        );

        Ok(entry)
    }

    /// Reconcile to a physical count: overwrite stock with `new_quantity`.
    ///
    /// The ledger entry's change is `new − previous`, so a count downward
    /// produces a negative change and a count upward a positive one.
    pub async fn adjust_stock(
        &self,
        product_id: &str,
        user_id: &str,
        new_quantity: i64,
        notes: Option<&str>,
    ) -> ServiceResult<StockLedgerEntry> {
        if new_quantity < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "new_quantity".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let product = ProductRepository::fetch(&mut tx, product_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;

        let change = new_quantity - product.stock_quantity;
        ProductRepository::set_stock(&mut tx, &product.id, new_quantity, now).await?;

        let entry = LedgerRepository::record_movement(
            &mut tx,
            &product.id,
            user_id,
            None,
            MovementType::Adjustment,
            change,
            new_quantity,
            &reference_number("ADJ", now),
            notes,
            now,
        )
        .await?;

        tx.commit().await.map_err(DbError::from)?;

        info!(
            product = %product.name,
            change,
            quantity_after = new_quantity,
            reference = entry.reference_number.as_deref().unwrap_or(""),
            "stock adjusted"
        );

        Ok(entry)
    }

    /// Movement history for a product, newest first.
    pub async fn product_history(
        &self,
        product_id: &str,
        limit: i64,
    ) -> ServiceResult<Vec<StockLedgerEntry>> {
        let entries = LedgerRepository::new(self.pool.clone())
            .history_for_product(product_id, limit)
            .await?;
        Ok(entries)
    }

    /// Active products at or below their low-stock threshold.
    pub async fn low_stock(&self) -> ServiceResult<Vec<Product>> {
        let products = ProductRepository::new(self.pool.clone()).low_stock().await?;
        Ok(products)
    }
}

/// `PREFIX-YYYYMMDD-XXXXXX` with a random uppercase hex suffix.
fn reference_number(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("{}-{}-{}", prefix, now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_number_shape() {
        let now = Utc::now();
        let reference = reference_number("SI", now);

        let parts: Vec<&str> = reference.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "SI");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[2], parts[2].to_uppercase());
    }

    #[test]
    fn test_reference_numbers_differ() {
        let now = Utc::now();
        assert_ne!(reference_number("ADJ", now), reference_number("ADJ", now));
    }

    use crate::pool::{Database, DbConfig};
    use kasir_core::{CoreError, Money};
    use crate::service::error::ServiceError;

    async fn setup() -> Database {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    async fn seed_product(db: &Database, id: &str, name: &str, stock: i64) {
        let now = Utc::now();
        db.products()
            .insert(&Product {
                id: id.to_string(),
                sku: format!("SKU-{}", id.to_uppercase()),
                name: name.to_string(),
                price: Money::from_minor(10_000),
                purchase_price: Money::from_minor(6_000),
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

    #[tokio::test]
    async fn test_stock_in_adds_and_logs() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 12).await;

        let entry = db
            .inventory_service()
            .stock_in("p1", "user-1", 20, Some("supplier-7"), Some("Weekly delivery"))
            .await
            .unwrap();

        assert_eq!(entry.movement, MovementType::StockIn);
        assert_eq!(entry.quantity_change, 20);
        assert_eq!(entry.quantity_after, 32);
        assert_eq!(entry.supplier_id.as_deref(), Some("supplier-7"));
        assert!(entry.reference_number.as_deref().unwrap().starts_with("SI-"));

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 32);
    }

    #[tokio::test]
    async fn test_stock_out_guards_against_negative() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 3).await;

        let err = db
            .inventory_service()
            .stock_out("p1", "user-1", 4, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::InsufficientStock { available: 3, requested: 4, .. })
        ));

        let entry = db
            .inventory_service()
            .stock_out("p1", "user-1", 3, Some("Damaged"))
            .await
            .unwrap();
        assert_eq!(entry.quantity_change, -3);
        assert_eq!(entry.quantity_after, 0);
        assert!(entry.reference_number.as_deref().unwrap().starts_with("SO-"));
    }

    #[tokio::test]
    async fn test_adjustment_down_records_negative_change() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 40).await;

        let entry = db
            .inventory_service()
            .adjust_stock("p1", "user-1", 33, Some("Physical count"))
            .await
            .unwrap();

        assert_eq!(entry.movement, MovementType::Adjustment);
        assert_eq!(entry.quantity_change, -7);
        assert_eq!(entry.quantity_after, 33);
        assert!(entry.reference_number.as_deref().unwrap().starts_with("ADJ-"));

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        assert_eq!(product.stock_quantity, 33);
    }

    #[tokio::test]
    async fn test_adjustment_rejects_negative_count() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 10).await;

        let err = db
            .inventory_service()
            .adjust_stock("p1", "user-1", -1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_ledger_sum_matches_stock_projection() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 0).await;

        let service = db.inventory_service();
        service.stock_in("p1", "user-1", 50, None, None).await.unwrap();
        service.stock_out("p1", "user-1", 8, None).await.unwrap();
        service.adjust_stock("p1", "user-1", 45, None).await.unwrap();
        service.stock_out("p1", "user-1", 5, None).await.unwrap();

        let product = db.products().get_by_id("p1").await.unwrap().unwrap();
        let net = db.ledger().net_change_for_product("p1").await.unwrap();
        assert_eq!(product.stock_quantity, 40);
        assert_eq!(net, product.stock_quantity);
    }

    #[tokio::test]
    async fn test_product_history_newest_first() {
        let db = setup().await;
        seed_product(&db, "p1", "Rice 5kg", 0).await;

        let service = db.inventory_service();
        service.stock_in("p1", "user-1", 10, None, None).await.unwrap();
        service.stock_out("p1", "user-1", 4, None).await.unwrap();

        let history = service.product_history("p1", 10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].movement, MovementType::StockOut);
        assert_eq!(history[1].movement, MovementType::StockIn);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let db = setup().await;

        let err = db
            .inventory_service()
            .stock_in("missing", "user-1", 5, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::NotFound { .. })));
    }
}
