//! # Receipt Rendering
//!
//! Pure plain-text receipt formatting. Rendering runs *after* the order
//! transaction commits and is best-effort: a failure here is logged by the
//! caller and never rolls back committed financial state.

use crate::money::Money;
use crate::types::OrderDetails;

const WIDTH: usize = 40;

/// Static store details printed in the receipt header.
#[derive(Debug, Clone)]
pub struct StoreInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: "KASIR POS".to_string(),
            address: String::new(),
            phone: String::new(),
        }
    }
}

/// Renders an order as a fixed-width text receipt.
///
/// Layout mirrors the printed slip: centered header, order metadata, one
/// block per line item, totals (discount row only when nonzero), paid and
/// change rows, footer.
pub fn render_receipt(store: &StoreInfo, details: &OrderDetails) -> String {
    let order = &details.order;
    let mut out = String::new();

    push_center(&mut out, &store.name);
    if !store.address.is_empty() {
        push_center(&mut out, &store.address);
    }
    if !store.phone.is_empty() {
        push_center(&mut out, &store.phone);
    }
    push_rule(&mut out);

    push_row(&mut out, "Order", &order.order_number);
    push_row(
        &mut out,
        "Date",
        &order.created_at.format("%d/%m/%Y %H:%M").to_string(),
    );
    push_row(&mut out, "Cashier", &order.user_id);
    push_rule(&mut out);

    for item in &details.items {
        out.push_str(&item.product_name);
        out.push('\n');
        let qty_price = format!("{} x {}", item.quantity, item.unit_price);
        push_row(&mut out, &qty_price, &item.subtotal.to_string());
    }
    push_rule(&mut out);

    push_row(&mut out, "Subtotal", &order.subtotal.to_string());
    if order.discount_amount.is_positive() {
        push_row(&mut out, "Discount", &format!("-{}", order.discount_amount));
    }
    push_row(&mut out, "Tax", &order.tax_amount.to_string());
    push_row(&mut out, "TOTAL", &order.total_amount.to_string());

    if order.amount_paid.is_positive() {
        push_row(&mut out, "Paid", &order.amount_paid.to_string());
        push_row(&mut out, "Change", &order.change().to_string());
    }

    push_rule(&mut out);
    push_center(&mut out, "Thank you");

    out
}

fn push_center(out: &mut String, text: &str) {
    let pad = WIDTH.saturating_sub(text.len()) / 2;
    out.push_str(&" ".repeat(pad));
    out.push_str(text);
    out.push('\n');
}

fn push_row(out: &mut String, left: &str, right: &str) {
    let fill = WIDTH.saturating_sub(left.len() + right.len()).max(1);
    out.push_str(left);
    out.push_str(&" ".repeat(fill));
    out.push_str(right);
    out.push('\n');
}

fn push_rule(out: &mut String) {
    out.push_str(&"-".repeat(WIDTH));
    out.push('\n');
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, OrderItem, OrderStatus, PaymentMethod};
    use chrono::Utc;

    fn sample_details() -> OrderDetails {
        let order = Order {
            id: "o1".into(),
            order_number: "#20260830-0007".into(),
            user_id: "budi".into(),
            customer_id: None,
            shift_id: None,
            subtotal: Money::from_minor(100_000),
            discount_amount: Money::from_minor(10_000),
            tax_amount: Money::from_minor(9_000),
            total_amount: Money::from_minor(99_000),
            amount_paid: Money::from_minor(100_000),
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Completed,
            notes: None,
            created_at: Utc::now(),
        };
        let items = vec![OrderItem {
            id: "i1".into(),
            order_id: "o1".into(),
            product_id: "p1".into(),
            product_name: "Kopi Susu".into(),
            unit_price: Money::from_minor(25_000),
            purchase_price: Money::from_minor(12_000),
            quantity: 4,
            subtotal: Money::from_minor(100_000),
        }];
        OrderDetails { order, items }
    }

    #[test]
    fn test_receipt_contains_order_facts() {
        let text = render_receipt(&StoreInfo::default(), &sample_details());

        assert!(text.contains("#20260830-0007"));
        assert!(text.contains("Kopi Susu"));
        assert!(text.contains("4 x 25000"));
        assert!(text.contains("99000"));
        assert!(text.contains("Change"));
    }

    #[test]
    fn test_discount_row_omitted_when_zero() {
        let mut details = sample_details();
        details.order.discount_amount = Money::zero();
        let text = render_receipt(&StoreInfo::default(), &details);
        assert!(!text.contains("Discount"));
    }
}
