//! # Service Module
//!
//! Transaction-owning business operations for Kasir POS.
//!
//! ## Service Layer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Service Layer Explained                           │
//! │                                                                         │
//! │  Caller                                                                 │
//! │    │  order_service.create_order(request)                               │
//! │    ▼                                                                    │
//! │  Service                                                                │
//! │  ├── validates the request (kasir-core rules)                           │
//! │  ├── BEGIN                                                              │
//! │  │     repository calls on the open transaction                         │
//! │  ├── COMMIT (or drop → rollback)                                        │
//! │  └── post-commit side effects (receipt), best-effort                    │
//! │    ▼                                                                    │
//! │  Repositories                                                           │
//! │                                                                         │
//! │  Each public operation is one transaction: it either lands whole        │
//! │  (order + items + ledger + stock) or leaves no trace.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Services
//!
//! - [`order::OrderService`] - Checkout and refunds
//! - [`inventory::InventoryService`] - Manual stock movements and history
//! - [`shift::ShiftService`] - Shift lifecycle and reconciliation

pub mod error;
pub mod inventory;
pub mod order;
pub mod shift;

pub use error::{ServiceError, ServiceResult};
