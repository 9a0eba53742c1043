//! Cart repository: the per-user `cart_lines` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use demitasse_core::{CartLineId, ExtraId, LineOptions, ProductId, UserId};

use super::RepositoryError;
use crate::models::CartLine;

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i32,
    user_id: i32,
    product_id: i32,
    quantity: i32,
    sugar_quantity: i16,
    has_cinnamon: bool,
    milk_extra_id: Option<i32>,
    syrup_extra_id: Option<i32>,
    has_condensed_milk: bool,
    created_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: CartLineId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            options: LineOptions {
                sugar_quantity: row.sugar_quantity,
                has_cinnamon: row.has_cinnamon,
                milk_extra_id: row.milk_extra_id.map(ExtraId::new),
                syrup_extra_id: row.syrup_extra_id.map(ExtraId::new),
                has_condensed_milk: row.has_condensed_milk,
            },
            created_at: row.created_at,
        }
    }
}

const CART_LINE_SELECT: &str = r"
    SELECT id, user_id, product_id, quantity, sugar_quantity, has_cinnamon,
           milk_extra_id, syrup_extra_id, has_condensed_milk, created_at
    FROM cart_lines
";

/// Repository for cart lines.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A user's cart lines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let sql = format!("{CART_LINE_SELECT} WHERE user_id = $1 ORDER BY created_at, id");
        let rows: Vec<CartLineRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One cart line by id. Callers check ownership against
    /// `CartLine::user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartLineId) -> Result<Option<CartLine>, RepositoryError> {
        let sql = format!("{CART_LINE_SELECT} WHERE id = $1");
        let row: Option<CartLineRow> = sqlx::query_as(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// The existing line (if any) for the same product with the exact same
    /// option tuple. Adding such a line again merges quantities instead of
    /// creating a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_matching(
        &self,
        user_id: UserId,
        product_id: ProductId,
        options: LineOptions,
    ) -> Result<Option<CartLine>, RepositoryError> {
        // IS NOT DISTINCT FROM so that NULL extra slots compare equal.
        let sql = format!(
            "{CART_LINE_SELECT} \
             WHERE user_id = $1 AND product_id = $2 \
               AND sugar_quantity = $3 AND has_cinnamon = $4 \
               AND milk_extra_id IS NOT DISTINCT FROM $5 \
               AND syrup_extra_id IS NOT DISTINCT FROM $6 \
               AND has_condensed_milk = $7"
        );
        let row: Option<CartLineRow> = sqlx::query_as(&sql)
            .bind(user_id.as_i32())
            .bind(product_id.as_i32())
            .bind(options.sugar_quantity)
            .bind(options.has_cinnamon)
            .bind(options.milk_extra_id.map(|id| id.as_i32()))
            .bind(options.syrup_extra_id.map(|id| id.as_i32()))
            .bind(options.has_condensed_milk)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Insert a new cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
        options: LineOptions,
    ) -> Result<CartLine, RepositoryError> {
        let row: CartLineRow = sqlx::query_as(
            "INSERT INTO cart_lines \
                 (user_id, product_id, quantity, sugar_quantity, has_cinnamon, \
                  milk_extra_id, syrup_extra_id, has_condensed_milk) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, user_id, product_id, quantity, sugar_quantity, \
                       has_cinnamon, milk_extra_id, syrup_extra_id, \
                       has_condensed_milk, created_at",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .bind(options.sugar_quantity)
        .bind(options.has_cinnamon)
        .bind(options.milk_extra_id.map(|id| id.as_i32()))
        .bind(options.syrup_extra_id.map(|id| id.as_i32()))
        .bind(options.has_condensed_milk)
        .fetch_one(self.pool)
        .await?;
        Ok(row.into())
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist, or
    /// `RepositoryError::Database` if the update fails.
    pub async fn update_quantity(
        &self,
        id: CartLineId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cart_lines SET quantity = $1 WHERE id = $2")
            .bind(quantity)
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace a line's option tuple.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist, or
    /// `RepositoryError::Database` if the update fails.
    pub async fn update_options(
        &self,
        id: CartLineId,
        options: LineOptions,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_lines \
             SET sugar_quantity = $1, has_cinnamon = $2, milk_extra_id = $3, \
                 syrup_extra_id = $4, has_condensed_milk = $5 \
             WHERE id = $6",
        )
        .bind(options.sugar_quantity)
        .bind(options.has_cinnamon)
        .bind(options.milk_extra_id.map(|id| id.as_i32()))
        .bind(options.syrup_extra_id.map(|id| id.as_i32()))
        .bind(options.has_condensed_milk)
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove one line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line does not exist, or
    /// `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: CartLineId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Empty a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
