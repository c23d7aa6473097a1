//! Service-level error type.
//!
//! Business failures (validation, missing entities, insufficient stock,
//! state conflicts) surface as [`kasir_core::CoreError`]; anything the
//! storage layer reports comes through as [`crate::error::DbError`]. Callers
//! that care about the distinction can match on the two arms.

use kasir_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::error::DbError;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage layer failed.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::Core(CoreError::not_found(entity, id))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Core(CoreError::conflict(message))
    }

    pub fn insufficient_stock(name: &str, available: i64, requested: i64) -> Self {
        Self::Core(CoreError::InsufficientStock {
            name: name.to_string(),
            available,
            requested,
        })
    }

    /// True when the failure is a business rejection rather than a storage
    /// fault.
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Core(_))
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::Core(CoreError::Validation(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
