//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Service (owns the transaction)                                        │
//! │       │                                                                 │
//! │       │  OrderRepository::insert_order(&mut tx, &order)                │
//! │       │  ProductRepository::decrement_stock(&mut tx, id, qty)          │
//! │       ▼                                                                 │
//! │  Repository                                                            │
//! │  ├── pool-backed methods: plain reads, standalone writes               │
//! │  └── connection-backed fns: steps of a larger atomic unit              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The split keeps every SQL statement in one place while leaving        │
//! │  transaction boundaries to the services.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog projection reads, stock updates
//! - [`order::OrderRepository`] - Orders, line-item snapshots, order numbers
//! - [`ledger::LedgerRepository`] - Append-only stock ledger
//! - [`shift::ShiftRepository`] - Cashier shifts and per-method totals

pub mod ledger;
pub mod order;
pub mod product;
pub mod shift;
