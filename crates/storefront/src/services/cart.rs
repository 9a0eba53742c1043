//! Cart business logic: adding, merging, repricing, and validating lines.
//!
//! Prices are never stored on cart lines. Every read reprices against the
//! current catalog, so a price change lands in open carts immediately.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use demitasse_core::{CartLineId, LineOptions, ProductId, UserId, round_price};

use crate::db::{CartRepository, CatalogRepository, RepositoryError};
use crate::models::CartLine;
use crate::models::catalog::{Extra, Product, find_extra};

/// Hard per-line quantity cap, regardless of stock.
pub const MAX_LINE_QUANTITY: i32 = 10;

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("product not found")]
    ProductNotFound,

    #[error("'{name}' is out of stock")]
    Unavailable { name: String },

    #[error("quantity must be between 1 and {MAX_LINE_QUANTITY}")]
    QuantityOutOfRange,

    #[error("only {available} more of '{name}' can be added")]
    StockLimit { name: String, available: i32 },

    #[error("cart line not found")]
    LineNotFound,

    #[error("cart line belongs to another user")]
    Forbidden,

    #[error("{field}: {message}")]
    InvalidOptions { field: &'static str, message: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Extras cost of one unit with the given options.
///
/// Eligibility is re-checked here, so a stale milk id on a product that no
/// longer takes milk prices as zero.
#[must_use]
pub fn extras_price(product: &Product, options: LineOptions, extras: &[Extra]) -> Decimal {
    let options = product.sanitize_options(options);
    let mut total = Decimal::ZERO;
    if let Some(id) = options.milk_extra_id {
        if let Some(extra) = find_extra(extras, id, demitasse_core::ExtraKind::Milk) {
            total += extra.price;
        }
    }
    if let Some(id) = options.syrup_extra_id {
        if let Some(extra) = find_extra(extras, id, demitasse_core::ExtraKind::Syrup) {
            total += extra.price;
        }
    }
    total
}

/// Total for a line: `(unit price + extras) * quantity`, rounded to kopecks.
#[must_use]
pub fn line_total(
    product: &Product,
    options: LineOptions,
    extras: &[Extra],
    quantity: i32,
) -> Decimal {
    let per_unit = product.price + extras_price(product, options, extras);
    round_price(per_unit * Decimal::from(quantity))
}

/// One cart line as rendered to the customer, repriced at read time.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub photo: Option<String>,
    pub size_volume: Option<String>,
    pub quantity: i32,
    #[serde(flatten)]
    pub options: LineOptions,
    pub unit_price: Decimal,
    pub extras_price: Decimal,
    pub line_total: Decimal,
    pub available: bool,
    pub max_quantity: i32,
}

/// The whole cart page payload.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_price: Decimal,
}

/// Cart operations for one authenticated user.
pub struct CartService<'a> {
    pool: &'a PgPool,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add a product to the cart, merging with an existing line that has
    /// the exact same option tuple.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` describing the first failed validation, or a
    /// wrapped repository error.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        options: LineOptions,
        extras: &[Extra],
    ) -> Result<CartLine, CartError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange);
        }
        options
            .validate()
            .map_err(|(field, message)| CartError::InvalidOptions { field, message })?;

        let catalog = CatalogRepository::new(self.pool);
        let product = catalog
            .get_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        if !product.is_available() {
            return Err(CartError::Unavailable {
                name: product.name.clone(),
            });
        }

        let options = product.sanitize_options(options);
        Self::check_extra_ids(&product, options, extras)?;

        let carts = CartRepository::new(self.pool);
        let existing = carts.find_matching(user_id, product_id, options).await?;
        let held = existing.as_ref().map_or(0, |line| line.quantity);

        if product.is_stock_managed() && held + quantity > product.stock_count {
            return Err(CartError::StockLimit {
                name: product.name.clone(),
                available: (product.stock_count - held).max(0),
            });
        }

        match existing {
            Some(mut line) => {
                let merged = held + quantity;
                if merged > MAX_LINE_QUANTITY {
                    return Err(CartError::QuantityOutOfRange);
                }
                carts.update_quantity(line.id, merged).await?;
                line.quantity = merged;
                Ok(line)
            }
            None => Ok(carts.insert(user_id, product_id, quantity, options).await?),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is missing,
    /// `CartError::Forbidden` if it belongs to someone else,
    /// `CartError::QuantityOutOfRange` or `CartError::StockLimit` on a bad
    /// quantity, or a wrapped repository error.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        quantity: i32,
    ) -> Result<(), CartError> {
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(CartError::QuantityOutOfRange);
        }

        let carts = CartRepository::new(self.pool);
        let line = Self::owned_line(&carts, user_id, line_id).await?;

        let catalog = CatalogRepository::new(self.pool);
        let product = catalog
            .get_by_id(line.product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;
        if product.is_stock_managed() && quantity > product.stock_count {
            return Err(CartError::StockLimit {
                name: product.name.clone(),
                available: product.stock_count.max(0),
            });
        }

        carts.update_quantity(line_id, quantity).await?;
        Ok(())
    }

    /// Replace the option tuple of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is missing,
    /// `CartError::Forbidden` if it belongs to someone else,
    /// `CartError::InvalidOptions` on a bad tuple, or a wrapped repository
    /// error.
    pub async fn update_options(
        &self,
        user_id: UserId,
        line_id: CartLineId,
        options: LineOptions,
        extras: &[Extra],
    ) -> Result<(), CartError> {
        options
            .validate()
            .map_err(|(field, message)| CartError::InvalidOptions { field, message })?;

        let carts = CartRepository::new(self.pool);
        let line = Self::owned_line(&carts, user_id, line_id).await?;

        let catalog = CatalogRepository::new(self.pool);
        let product = catalog
            .get_by_id(line.product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        let options = product.sanitize_options(options);
        Self::check_extra_ids(&product, options, extras)?;

        carts.update_options(line_id, options).await?;
        Ok(())
    }

    /// Remove one line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineNotFound` if the line is missing,
    /// `CartError::Forbidden` if it belongs to someone else, or a wrapped
    /// repository error.
    pub async fn remove(&self, user_id: UserId, line_id: CartLineId) -> Result<(), CartError> {
        let carts = CartRepository::new(self.pool);
        Self::owned_line(&carts, user_id, line_id).await?;
        carts.delete(line_id).await?;
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a wrapped repository error.
    pub async fn clear(&self, user_id: UserId) -> Result<(), CartError> {
        CartRepository::new(self.pool).clear(user_id).await?;
        Ok(())
    }

    /// The cart as shown to the customer, every line repriced against the
    /// current catalog.
    ///
    /// # Errors
    ///
    /// Returns a wrapped repository error.
    pub async fn view(&self, user_id: UserId, extras: &[Extra]) -> Result<CartView, CartError> {
        let lines = CartRepository::new(self.pool).list_for_user(user_id).await?;
        let ids: Vec<ProductId> = lines.iter().map(|line| line.product_id).collect();
        let products = CatalogRepository::new(self.pool).get_by_ids(&ids).await?;

        let mut views = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;
        for line in lines {
            let Some(product) = products.iter().find(|p| p.id == line.product_id) else {
                // Product deleted since it was carted; skip the line.
                continue;
            };
            let per_line_extras = extras_price(product, line.options, extras);
            let subtotal = line_total(product, line.options, extras, line.quantity);
            total += subtotal;
            views.push(CartLineView {
                id: line.id,
                product_id: product.id,
                name: product.name.clone(),
                slug: product.slug.clone(),
                photo: product.photo.clone(),
                size_volume: product.size.as_ref().map(|s| s.volume.clone()),
                quantity: line.quantity,
                options: product.sanitize_options(line.options),
                unit_price: product.price,
                extras_price: per_line_extras,
                line_total: subtotal,
                available: product.is_available(),
                max_quantity: product.max_line_quantity(),
            });
        }

        Ok(CartView {
            lines: views,
            total_price: round_price(total),
        })
    }

    /// Fetch a line and reject callers who do not own it.
    async fn owned_line(
        carts: &CartRepository<'_>,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<CartLine, CartError> {
        let line = carts.get(line_id).await?.ok_or(CartError::LineNotFound)?;
        if line.user_id != user_id {
            return Err(CartError::Forbidden);
        }
        Ok(line)
    }

    /// Referenced extra ids must exist and carry the right kind.
    fn check_extra_ids(
        product: &Product,
        options: LineOptions,
        extras: &[Extra],
    ) -> Result<(), CartError> {
        if product.can_add_milk() {
            if let Some(id) = options.milk_extra_id {
                if find_extra(extras, id, demitasse_core::ExtraKind::Milk).is_none() {
                    return Err(CartError::InvalidOptions {
                        field: "milk_extra_id",
                        message: format!("unknown milk extra {id}"),
                    });
                }
            }
        }
        if product.can_add_syrup() {
            if let Some(id) = options.syrup_extra_id {
                if find_extra(extras, id, demitasse_core::ExtraKind::Syrup).is_none() {
                    return Err(CartError::InvalidOptions {
                        field: "syrup_extra_id",
                        message: format!("unknown syrup extra {id}"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use demitasse_core::ExtraId;

    use super::*;
    use crate::models::catalog::test_fixtures::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_extras_price_sums_milk_and_syrup() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        let extras = vec![oat_milk(), caramel_syrup()];
        let options = LineOptions {
            milk_extra_id: Some(ExtraId::new(6)),
            syrup_extra_id: Some(ExtraId::new(7)),
            ..Default::default()
        };
        assert_eq!(extras_price(&latte, options, &extras), d("90.00"));
    }

    #[test]
    fn test_extras_price_ignores_ineligible_slots() {
        let mut americano = product(3, "Americano", "150.00", coffee_category());
        americano.allows_extras = false;
        let extras = vec![oat_milk(), caramel_syrup()];
        let options = LineOptions {
            milk_extra_id: Some(ExtraId::new(6)),
            syrup_extra_id: Some(ExtraId::new(7)),
            ..Default::default()
        };
        assert_eq!(extras_price(&americano, options, &extras), Decimal::ZERO);
    }

    #[test]
    fn test_extras_price_skips_unknown_ids() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        let extras = vec![oat_milk()];
        let options = LineOptions {
            milk_extra_id: Some(ExtraId::new(99)),
            ..Default::default()
        };
        assert_eq!(extras_price(&latte, options, &extras), Decimal::ZERO);
    }

    #[test]
    fn test_line_total_multiplies_and_rounds() {
        let latte = product(1, "Latte", "250.00", coffee_category());
        let extras = vec![oat_milk()];
        let options = LineOptions {
            milk_extra_id: Some(ExtraId::new(6)),
            ..Default::default()
        };
        // (250 + 50) * 3
        assert_eq!(line_total(&latte, options, &extras, 3), d("900.00"));
    }

    #[test]
    fn test_line_total_plain_product() {
        let cheesecake = product(2, "Cheesecake", "320.00", dessert_category());
        assert_eq!(
            line_total(&cheesecake, LineOptions::default(), &[], 2),
            d("640.00")
        );
    }
}
