//! Order placement and history.
//!
//! The total is always recomputed server side from the catalog at placement
//! time. Client-submitted prices are never trusted.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use demitasse_core::{OrderId, UserId, round_price};

use crate::db::{
    CartRepository, CatalogRepository, NewOrderLine, OrderRepository, OrderWithLines,
    RepositoryError,
};
use crate::models::catalog::Extra;
use crate::services::cart::extras_price;

/// Errors surfaced by order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("your cart is empty")]
    EmptyCart,

    #[error("'{name}' is no longer available")]
    Unavailable { name: String },

    #[error("only {available} of '{name}' left in stock")]
    InsufficientStock { name: String, available: i32 },

    /// Placement failed mid-transaction. Details are logged, the customer
    /// gets a generic message.
    #[error("order could not be placed, please try again")]
    PlacementFailed,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Order operations for one authenticated user.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Turn the user's cart into an order.
    ///
    /// Revalidates every line against the current catalog, freezes unit and
    /// extras prices into order lines, and hands the whole set to the
    /// repository for atomic placement.
    ///
    /// # Errors
    ///
    /// Returns an `OrderError` naming the first failed check, or
    /// `OrderError::PlacementFailed` when the transaction itself fails.
    pub async fn place_order(
        &self,
        user_id: UserId,
        extras: &[Extra],
    ) -> Result<OrderId, OrderError> {
        let cart_lines = CartRepository::new(self.pool).list_for_user(user_id).await?;
        if cart_lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let ids: Vec<_> = cart_lines.iter().map(|line| line.product_id).collect();
        let products = CatalogRepository::new(self.pool).get_by_ids(&ids).await?;

        let mut new_lines = Vec::with_capacity(cart_lines.len());
        let mut total = Decimal::ZERO;
        for line in &cart_lines {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| OrderError::Unavailable {
                    name: format!("product {}", line.product_id),
                })?;

            if !product.is_available() {
                return Err(OrderError::Unavailable {
                    name: product.name.clone(),
                });
            }
            if product.is_stock_managed() && line.quantity > product.stock_count {
                return Err(OrderError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock_count.max(0),
                });
            }

            let options = product.sanitize_options(line.options);
            let line_extras = extras_price(product, options, extras);
            total += (product.price + line_extras) * Decimal::from(line.quantity);

            new_lines.push(NewOrderLine {
                product_id: product.id,
                quantity: line.quantity,
                options,
                unit_price: product.price,
                extras_price: line_extras,
                stock_managed: product.is_stock_managed(),
            });
        }

        let total = round_price(total);
        let placed = OrderRepository::new(self.pool)
            .place(user_id, total, &new_lines)
            .await;

        match placed {
            Ok(order_id) => Ok(order_id),
            Err(e) => {
                tracing::error!(
                    user_id = user_id.as_i32(),
                    error = %e,
                    "order placement failed, transaction rolled back"
                );
                Err(OrderError::PlacementFailed)
            }
        }
    }

    /// The user's order history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a wrapped repository error.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<OrderWithLines>, OrderError> {
        Ok(OrderRepository::new(self.pool).list_for_user(user_id).await?)
    }
}
