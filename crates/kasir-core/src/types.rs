//! # Domain Types
//!
//! Core domain types for the order transaction and stock-ledger engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │ StockLedgerEntry│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  sku (business) │   │  order_number   │   │  quantity_change│       │
//! │  │  stock_quantity │   │  status         │   │  quantity_after │       │
//! │  │  price          │   │  total_amount   │   │  type           │       │
//! │  └─────────────────┘   └────────┬────────┘   └─────────────────┘       │
//! │                                 │                                       │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │    OrderItem    │   │      Shift      │       │
//! │                        │  (snapshots)    │   │  opening_cash   │       │
//! │                        └─────────────────┘   │  closing_cash   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where humans need one: sku, order_number, reference_number
//!
//! ## Stock Quantity Is a Projection
//! `Product::stock_quantity` is a cached projection of the stock ledger: its
//! true value is always `initial stock + Σ quantity_change` over the
//! product's ledger entries. It is mutated only by the operations that also
//! append a ledger entry, never directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit sale price in minor units.
    pub price: Money,

    /// Unit purchase (cost) price, for margin reporting.
    pub purchase_price: Money,

    /// Current stock level. Projection of the stock ledger; never negative.
    pub stock_quantity: i64,

    /// Stock level at or below which the product counts as low-stock.
    pub low_stock_threshold: i64,

    /// Optional category reference (catalog CRUD lives outside this core).
    pub category_id: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Checks whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Whether the product is at or below its low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.low_stock_threshold
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of an order.
///
/// An order is created `Completed` (the sale transaction commits the
/// finished order in one unit) and transitions to `Refunded` at most once.
/// There is no transition out of `Refunded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Sale committed; stock decremented and ledger written.
    Completed,
    /// Sale reversed; stock restored via adjustment entries.
    Refunded,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment. The only method that affects shift cash.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// E-wallet / QR payment.
    Ewallet,
    /// Anything else (voucher, transfer, ...).
    Other,
}

impl PaymentMethod {
    /// All methods, in breakdown display order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Ewallet,
        PaymentMethod::Other,
    ];
}

// =============================================================================
// Order
// =============================================================================

/// A committed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    /// Human-readable, date-scoped sequential number (`#YYYYMMDD-0001`).
    pub order_number: String,
    /// Cashier who rang up the sale.
    pub user_id: String,
    pub customer_id: Option<String>,
    pub shift_id: Option<String>,
    pub subtotal: Money,
    pub discount_amount: Money,
    /// Tax computed on the discounted subtotal, not the raw subtotal.
    pub tax_amount: Money,
    pub total_amount: Money,
    pub amount_paid: Money,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Change due to the customer (zero when paid exactly or underpaid).
    #[inline]
    pub fn change(&self) -> Money {
        self.amount_paid.saturating_sub_floor_zero(self.total_amount)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line item in an order.
///
/// Uses the snapshot pattern: product name and prices are frozen at the time
/// of sale, so historical orders are never affected by later catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit sale price at time of sale (frozen).
    pub unit_price: Money,
    /// Unit purchase price at time of sale (frozen).
    pub purchase_price: Money,
    pub quantity: i64,
    /// Line subtotal: unit_price × quantity.
    pub subtotal: Money,
}

/// An order together with its line-item snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

// =============================================================================
// Stock Ledger
// =============================================================================

/// The kind of stock movement a ledger entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Negative delta written by the order transaction.
    Sale,
    /// Positive delta from a delivery or other receipt of goods.
    StockIn,
    /// Negative delta for breakage, loss, internal use.
    StockOut,
    /// Reconciliation to a counted quantity, or a refund restoring stock.
    /// Delta may be either sign.
    Adjustment,
}

/// One immutable, append-only record of a stock quantity change.
///
/// The ledger is the system of record for inventory history. Entries are
/// never updated or deleted after creation; corrections are made by writing
/// a new, opposite-signed entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLedgerEntry {
    pub id: String,
    pub product_id: String,
    /// Actor who performed the operation.
    pub user_id: String,
    pub supplier_id: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "type"))]
    #[serde(rename = "type")]
    pub movement: MovementType,
    /// Signed quantity delta applied to the product.
    pub quantity_change: i64,
    /// Product stock level immediately after this entry's transaction.
    pub quantity_after: i64,
    /// Human reference: order number for sales/refunds, `SI-`/`SO-`/`ADJ-`
    /// numbers for manual operations.
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Shift
// =============================================================================

/// The status of a cashier shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    Closed,
}

/// A cashier's bounded work session, used to reconcile expected vs. actual
/// cash. A cashier holds at most one open shift at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: String,
    pub user_id: String,
    pub opening_cash: Money,
    /// Null while the shift is open.
    pub closing_cash: Option<Money>,
    pub status: ShiftStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Per-payment-method totals over a shift's completed orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdownRow {
    pub method: PaymentMethod,
    pub order_count: i64,
    pub total: Money,
}

/// Reconciliation result for a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftSummary {
    pub shift: Shift,
    /// Completed orders attached to the shift.
    pub total_orders: i64,
    /// Sum of completed order totals across all payment methods.
    pub total_sales: Money,
    pub payment_breakdown: Vec<PaymentBreakdownRow>,
    /// opening_cash + sum of cash-method order totals.
    pub expected_cash: Money,
    /// The counted drawer amount (closing_cash); zero while open.
    pub actual_cash: Money,
    /// actual_cash − expected_cash. Negative means the drawer is short.
    pub cash_difference: Money,
}

impl ShiftSummary {
    /// Total taken for one payment method, zero if no orders used it.
    pub fn method_total(&self, method: PaymentMethod) -> Money {
        self.payment_breakdown
            .iter()
            .find(|row| row.method == method)
            .map(|row| row.total)
            .unwrap_or_default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_product_can_sell() {
        let product = sample_product(5);
        assert!(product.can_sell(5));
        assert!(!product.can_sell(6));
    }

    #[test]
    fn test_product_low_stock() {
        assert!(sample_product(3).is_low_stock());
        assert!(!sample_product(30).is_low_stock());
    }

    #[test]
    fn test_order_change() {
        let mut order = sample_order();
        order.total_amount = Money::from_minor(99_000);
        order.amount_paid = Money::from_minor(100_000);
        assert_eq!(order.change().minor(), 1_000);

        order.amount_paid = Money::from_minor(99_000);
        assert_eq!(order.change(), Money::zero());
    }

    fn sample_product(stock: i64) -> Product {
        Product {
            id: "p1".into(),
            sku: "COKE-330".into(),
            name: "Coca-Cola 330ml".into(),
            price: Money::from_minor(5_000),
            purchase_price: Money::from_minor(3_500),
            stock_quantity: stock,
            low_stock_threshold: 5,
            category_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_order() -> Order {
        Order {
            id: "o1".into(),
            order_number: "#20260830-0001".into(),
            user_id: "u1".into(),
            customer_id: None,
            shift_id: None,
            subtotal: Money::from_minor(100_000),
            discount_amount: Money::zero(),
            tax_amount: Money::zero(),
            total_amount: Money::from_minor(100_000),
            amount_paid: Money::from_minor(100_000),
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Completed,
            notes: None,
            created_at: Utc::now(),
        }
    }
}
