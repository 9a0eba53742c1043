//! Cart line model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use demitasse_core::{CartLineId, LineOptions, ProductId, UserId};

/// One line of a user's cart: a product variation, a quantity, and the
/// selected option tuple.
///
/// Lines are logically unique per (user, product, option tuple); adding the
/// same product with the same options again increments the existing line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(flatten)]
    pub options: LineOptions,
    pub created_at: DateTime<Utc>,
}
