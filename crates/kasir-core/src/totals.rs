//! # Order Totals
//!
//! The monetary math of a sale, in one place so the ordering rule cannot be
//! bypassed by a caller.
//!
//! ## The Discount-Then-Tax Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal            Σ (unit_price × quantity) over line items         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  discounted          max(subtotal − discount, 0)   ← clamped at zero   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tax_amount          discounted × tax_rate         ← tax on the        │
//! │       │                                              DISCOUNTED amount │
//! │       ▼                                                                 │
//! │  total_amount        discounted + tax_amount                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tax on the post-discount subtotal is the business rule observed at the
//! terminal, not an accident of implementation order.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::TaxRate;

/// Computed monetary breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub total_amount: Money,
}

impl OrderTotals {
    /// Computes order totals from a subtotal, an order-level discount, and a
    /// tax rate.
    ///
    /// The discount is clamped so the discounted subtotal never goes
    /// negative; tax is computed on the discounted subtotal.
    ///
    /// ```rust
    /// use kasir_core::{Money, OrderTotals, TaxRate};
    ///
    /// let totals = OrderTotals::compute(
    ///     Money::from_minor(100_000),
    ///     Money::from_minor(10_000),
    ///     TaxRate::from_bps(1000), // 10%
    /// );
    /// assert_eq!(totals.tax_amount.minor(), 9_000);
    /// assert_eq!(totals.total_amount.minor(), 99_000);
    /// ```
    pub fn compute(subtotal: Money, discount: Money, tax_rate: TaxRate) -> OrderTotals {
        let discounted = subtotal.saturating_sub_floor_zero(discount);
        let tax_amount = discounted.calculate_tax(tax_rate);

        OrderTotals {
            subtotal,
            discount_amount: discount,
            tax_amount,
            total_amount: discounted + tax_amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_on_discounted_subtotal() {
        // subtotal 100_000, discount 10_000, tax 10%:
        // (100_000 - 10_000) × 1.10 = 99_000
        let totals = OrderTotals::compute(
            Money::from_minor(100_000),
            Money::from_minor(10_000),
            TaxRate::from_bps(1000),
        );

        assert_eq!(totals.subtotal.minor(), 100_000);
        assert_eq!(totals.discount_amount.minor(), 10_000);
        assert_eq!(totals.tax_amount.minor(), 9_000);
        assert_eq!(totals.total_amount.minor(), 99_000);
    }

    #[test]
    fn test_no_discount_no_tax() {
        let totals = OrderTotals::compute(
            Money::from_minor(45_000),
            Money::zero(),
            TaxRate::zero(),
        );
        assert_eq!(totals.total_amount.minor(), 45_000);
        assert_eq!(totals.tax_amount, Money::zero());
    }

    #[test]
    fn test_oversized_discount_clamps_to_zero() {
        // Discount past the subtotal: discounted base is zero, so tax and
        // total are zero too. Total never goes negative.
        let totals = OrderTotals::compute(
            Money::from_minor(20_000),
            Money::from_minor(50_000),
            TaxRate::from_bps(1000),
        );
        assert_eq!(totals.tax_amount, Money::zero());
        assert_eq!(totals.total_amount, Money::zero());
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 125 at 11% = 13.75 → 14
        let totals = OrderTotals::compute(
            Money::from_minor(125),
            Money::zero(),
            TaxRate::from_bps(1100),
        );
        assert_eq!(totals.tax_amount.minor(), 14);
        assert_eq!(totals.total_amount.minor(), 139);
    }
}
