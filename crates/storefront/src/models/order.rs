//! Order and order line models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use demitasse_core::{LineOptions, OrderId, OrderLineId, OrderStatus, ProductId, UserId};

/// A placed order.
///
/// Immutable after creation except for `status`; `total_price` is computed
/// server-side at placement and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// One line of a placed order.
///
/// `unit_price` and `extras_price` are snapshots taken at placement time;
/// `unit_price + extras_price` is the authoritative per-unit price for this
/// historical line, independent of later catalog changes.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(flatten)]
    pub options: LineOptions,
    pub unit_price: Decimal,
    pub extras_price: Decimal,
}
