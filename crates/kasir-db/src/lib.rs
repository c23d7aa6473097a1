//! # kasir-db: Storage and Transaction Layer for Kasir POS
//!
//! This crate owns persistence for the Kasir POS engine: a local SQLite
//! database accessed through sqlx, plus the transaction-owning services
//! that implement checkout, refunds, stock movements, and shifts.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Data Flow                              │
//! │                                                                         │
//! │  Caller (HTTP/routing layer, out of scope)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │  Repositories │    │   Database   │  │   │
//! │  │   │ (service/*)   │    │(repository/*) │    │  (pool.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ OrderService  │───►│ OrderRepo     │───►│ SqlitePool   │  │   │
//! │  │   │ InventorySvc  │    │ ProductRepo   │    │ WAL mode     │  │   │
//! │  │   │ ShiftService  │    │ LedgerRepo    │    │ migrations   │  │   │
//! │  │   │ (own the tx)  │    │ ShiftRepo     │    │ (embedded)   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: for tests)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, order, ledger, shift)
//! - [`service`] - Transaction-owning business operations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasir_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/kasir.db")).await?;
//!
//! let order = db.order_service().create_order(request).await?;
//! let entry = db.inventory_service().stock_in(&pid, &uid, 20, None, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::ledger::LedgerRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::shift::ShiftRepository;

// Service re-exports for convenience
pub use service::inventory::InventoryService;
pub use service::order::{CreateOrder, OrderLine, OrderService, ReceiptSink};
pub use service::shift::ShiftService;
pub use service::{ServiceError, ServiceResult};
