//! # Order Service
//!
//! Checkout and refunds.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      create_order, one transaction                      │
//! │                                                                         │
//! │  validate request (no DB touched yet)                                  │
//! │  BEGIN                                                                  │
//! │  ├── claim order number (counter upsert, serializes on write lock)     │
//! │  ├── per line:                                                          │
//! │  │     fetch product          → NotFound if missing                    │
//! │  │     conditional decrement  → InsufficientStock if guard rejects     │
//! │  ├── compute totals (discount clamped, tax on discounted subtotal)     │
//! │  ├── insert order + item snapshots                                     │
//! │  └── per line: append sale ledger entry (negative change)              │
//! │  COMMIT                                                                 │
//! │  then: render receipt, best-effort (failure logged, never rolled back) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure at any line rolls the whole transaction back: no order, no
//! stock change, no ledger entry survives a partial checkout.

use std::sync::Arc;

use chrono::Utc;
use kasir_core::receipt::{render_receipt, StoreInfo};
use kasir_core::types::{
    MovementType, Order, OrderDetails, OrderItem, OrderStatus, PaymentMethod, TaxRate,
};
use kasir_core::validation::{validate_non_negative, validate_order_items};
use kasir_core::{Money, OrderTotals};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::ledger::LedgerRepository;
use crate::repository::order::OrderRepository;
use crate::repository::product::ProductRepository;
use crate::service::error::{ServiceError, ServiceResult};

/// One requested line of a checkout.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A checkout request.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub user_id: String,
    pub items: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
    pub discount_amount: Money,
    pub tax_rate: TaxRate,
    pub amount_paid: Money,
    pub customer_id: Option<String>,
    pub shift_id: Option<String>,
    pub notes: Option<String>,
}

/// Post-commit receipt delivery (printer, file, UI channel).
///
/// Delivery is best-effort: the sale is already committed when this runs,
/// so an error here is logged and dropped, never escalated.
pub trait ReceiptSink: Send + Sync {
    fn deliver(
        &self,
        order_number: &str,
        receipt: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Service for checkout and refunds.
#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    store: StoreInfo,
    receipt_sink: Option<Arc<dyn ReceiptSink>>,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            store: StoreInfo::default(),
            receipt_sink: None,
        }
    }

    /// Sets the store header used on rendered receipts.
    pub fn with_store(mut self, store: StoreInfo) -> Self {
        self.store = store;
        self
    }

    /// Attaches a receipt sink invoked after each successful checkout.
    pub fn with_receipt_sink(mut self, sink: Arc<dyn ReceiptSink>) -> Self {
        self.receipt_sink = Some(sink);
        self
    }

    /// Atomically record a sale: order row, item snapshots, stock
    /// decrements, and one sale ledger entry per line.
    pub async fn create_order(&self, request: CreateOrder) -> ServiceResult<OrderDetails> {
        let quantities: Vec<i64> = request.items.iter().map(|line| line.quantity).collect();
        validate_order_items(&quantities)?;
        validate_non_negative("discount_amount", request.discount_amount)?;
        validate_non_negative("amount_paid", request.amount_paid)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // First statement is a write, so concurrent checkouts queue on the
        // database write lock instead of failing a later lock upgrade.
        let order_number = OrderRepository::next_order_number(&mut tx, now).await?;

        let mut subtotal = Money::zero();
        let mut movements = Vec::with_capacity(request.items.len());
        let mut items = Vec::with_capacity(request.items.len());
        let order_id = Uuid::new_v4().to_string();

        for line in &request.items {
            let product = ProductRepository::fetch(&mut tx, &line.product_id)
                .await?
                .ok_or_else(|| ServiceError::not_found("Product", &line.product_id))?;

            if !product.is_active {
                return Err(ServiceError::conflict(format!(
                    "Product {} is inactive",
                    product.name
                )));
            }

            let quantity_after =
                ProductRepository::decrement_stock(&mut tx, &product.id, line.quantity, now)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::insufficient_stock(
                            &product.name,
                            product.stock_quantity,
                            line.quantity,
                        )
                    })?;

            let line_subtotal = product.price.multiply_quantity(line.quantity);
            subtotal += line_subtotal;

            items.push(OrderItem {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                unit_price: product.price,
                purchase_price: product.purchase_price,
                quantity: line.quantity,
                subtotal: line_subtotal,
            });
            movements.push((product.id, line.quantity, quantity_after));
        }

        let totals = OrderTotals::compute(subtotal, request.discount_amount, request.tax_rate);

        let order = Order {
            id: order_id.clone(),
            order_number: order_number.clone(),
            user_id: request.user_id.clone(),
            customer_id: request.customer_id.clone(),
            shift_id: request.shift_id.clone(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount_amount,
            tax_amount: totals.tax_amount,
            total_amount: totals.total_amount,
            amount_paid: request.amount_paid,
            payment_method: request.payment_method,
            status: OrderStatus::Completed,
            notes: request.notes.clone(),
            created_at: now,
        };

        OrderRepository::insert_order(&mut tx, &order).await?;
        for item in &items {
            OrderRepository::insert_item(&mut tx, item).await?;
        }

        for (product_id, quantity, quantity_after) in &movements {
            LedgerRepository::record_movement(
                &mut tx,
                product_id,
                &request.user_id,
                None,
                MovementType::Sale,
                -quantity,
                *quantity_after,
                &order_number,
                Some(&format!("Sale {}", order_number)),
                now,
            )
            .await?;
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            order_number = %order.order_number,
            total = %order.total_amount,
            items = items.len(),
            "order completed"
        );

        let details = OrderDetails { order, items };
        self.send_receipt(&details);

        Ok(details)
    }

    /// Reverse a completed sale: restore stock, append adjustment ledger
    /// entries referencing the original order number, flip status to
    /// `refunded`.
    pub async fn refund_order(&self, order_id: &str, user_id: &str) -> ServiceResult<Order> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let mut order = OrderRepository::fetch(&mut tx, order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))?;

        if order.status != OrderStatus::Completed {
            return Err(ServiceError::conflict(format!(
                "Order {} is already refunded",
                order.order_number
            )));
        }

        let items = OrderRepository::fetch_items(&mut tx, order_id).await?;

        for item in &items {
            let quantity_after =
                ProductRepository::increment_stock(&mut tx, &item.product_id, item.quantity, now)
                    .await?;

            LedgerRepository::record_movement(
                &mut tx,
                &item.product_id,
                user_id,
                None,
                MovementType::Adjustment,
                item.quantity,
                quantity_after,
                &order.order_number,
                Some(&format!("Refund {}", order.order_number)),
                now,
            )
            .await?;
        }

        // Conditional flip backstops a racing refund of the same order.
        let flipped = OrderRepository::mark_refunded(&mut tx, order_id).await?;
        if !flipped {
            return Err(ServiceError::conflict(format!(
                "Order {} is already refunded",
                order.order_number
            )));
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(order_number = %order.order_number, "order refunded");

        order.status = OrderStatus::Refunded;
        Ok(order)
    }

    /// Fetch an order with its line items.
    pub async fn get_order(&self, order_id: &str) -> ServiceResult<OrderDetails> {
        OrderRepository::new(self.pool.clone())
            .get_with_items(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Order", order_id))
    }

    fn send_receipt(&self, details: &OrderDetails) {
        let Some(sink) = &self.receipt_sink else {
            return;
        };

        let rendered = render_receipt(&self.store, details);
        match sink.deliver(&details.order.order_number, &rendered) {
            Ok(()) => debug!(order_number = %details.order.order_number, "receipt delivered"),
            Err(err) => warn!(
                order_number = %details.order.order_number,
                error = %err,
                "receipt delivery failed; sale is unaffected"
            ),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
