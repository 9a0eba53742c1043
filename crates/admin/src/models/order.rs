//! Order views for the staff dashboard.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use demitasse_core::{OrderId, OrderLineId, OrderStatus, ProductId};

/// One line of an order as shown to staff, with names resolved and the
/// option tuple flattened into a description.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderLine {
    pub id: OrderLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub size_volume: Option<String>,
    pub quantity: i32,
    /// Human-readable option summary ("2 sugar, cinnamon, Oat milk").
    pub options_description: String,
    pub unit_price: Decimal,
    pub extras_price: Decimal,
}

/// An order as shown on the dashboard tabs.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_price: Decimal,
    pub status: OrderStatus,
    /// Statuses this order may move to next.
    pub allowed_transitions: Vec<OrderStatus>,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<AdminOrderLine>,
}

/// Build the option summary for a line from its stored tuple and the
/// resolved extras names.
#[must_use]
pub fn describe_options(
    sugar_quantity: i16,
    has_cinnamon: bool,
    milk_name: Option<&str>,
    syrup_name: Option<&str>,
    has_condensed_milk: bool,
) -> String {
    let mut parts = Vec::new();
    if sugar_quantity > 0 {
        parts.push(format!("{sugar_quantity} sugar"));
    }
    if has_cinnamon {
        parts.push("cinnamon".to_owned());
    }
    if let Some(name) = milk_name {
        parts.push(name.to_owned());
    }
    if let Some(name) = syrup_name {
        parts.push(name.to_owned());
    }
    if has_condensed_milk {
        parts.push("condensed milk".to_owned());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_options_joins_parts() {
        let description = describe_options(2, true, Some("Oat milk"), None, false);
        assert_eq!(description, "2 sugar, cinnamon, Oat milk");
    }

    #[test]
    fn test_describe_options_plain_is_empty() {
        assert_eq!(describe_options(0, false, None, None, false), "");
    }
}
