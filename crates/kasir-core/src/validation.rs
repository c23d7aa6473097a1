//! # Validation Module
//!
//! Input validation for the operation surface. Runs before any transaction
//! opens: a request that fails here leaves the database untouched.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (HTTP layer, out of scope)                            │
//! │  └── Request parsing, type checks                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock_quantity >= 0)                                       │
//! │  ├── UNIQUE constraints (order_number, one open shift per user)        │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be strictly positive
/// - Must not exceed `MAX_ITEM_QUANTITY`
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the item list of an order request.
///
/// ## Rules
/// - Must not be empty
/// - Must not exceed `MAX_ORDER_ITEMS` lines
/// - Every quantity must pass [`validate_quantity`]
pub fn validate_order_items(quantities: &[i64]) -> ValidationResult<()> {
    if quantities.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if quantities.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::TooMany {
            field: "items".to_string(),
            max: MAX_ORDER_ITEMS,
        });
    }

    for &quantity in quantities {
        validate_quantity(quantity)?;
    }

    Ok(())
}

/// Validates a monetary amount that must not be negative
/// (discounts, amounts paid, opening/closing cash).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_order_items() {
        assert!(validate_order_items(&[1, 2, 3]).is_ok());
        assert!(validate_order_items(&[]).is_err());
        assert!(validate_order_items(&[1, 0]).is_err());

        let too_many: Vec<i64> = vec![1; MAX_ORDER_ITEMS + 1];
        assert!(validate_order_items(&too_many).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("discount", Money::zero()).is_ok());
        assert!(validate_non_negative("discount", Money::from_minor(500)).is_ok());
        assert!(validate_non_negative("discount", Money::from_minor(-1)).is_err());
    }
}
