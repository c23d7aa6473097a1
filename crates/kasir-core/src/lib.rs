//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of the order transaction and stock-ledger
//! engine. It contains all business rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Caller (HTTP routing layer, out of scope)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                kasir-db (services + repositories)               │   │
//! │  │    OrderService, InventoryService, ShiftService                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ OrderTotals│ │   rules   │  │   │
//! │  │   │   Order   │  │  TaxRate  │  │ tax math  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, StockLedgerEntry, Shift, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Order totals math: discount clamping, tax-on-discounted rule
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`receipt`] - Plain-text receipt rendering (pure formatting)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

pub mod error;
pub mod money;
pub mod receipt;
pub mod totals;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::OrderTotals;
pub use types::*;

/// Maximum line items allowed in a single order.
///
/// Prevents runaway orders and keeps transaction sizes reasonable.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
