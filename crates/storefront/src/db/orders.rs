//! Order repository: order placement and history.
//!
//! Placement runs in a single transaction so that the order header, its
//! lines, the stock decrements, and the cart clear either all land or none
//! do.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use demitasse_core::{
    ExtraId, LineOptions, OrderId, OrderLineId, OrderStatus, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{Order, OrderLine};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|_| RepositoryError::DataCorruption(format!(
                "order {} has unknown status '{}'",
                row.id, row.status
            )))?;
        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            total_price: row.total_price,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    quantity: i32,
    sugar_quantity: i16,
    has_cinnamon: bool,
    milk_extra_id: Option<i32>,
    syrup_extra_id: Option<i32>,
    has_condensed_milk: bool,
    unit_price: Decimal,
    extras_price: Decimal,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        Self {
            id: OrderLineId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            options: LineOptions {
                sugar_quantity: row.sugar_quantity,
                has_cinnamon: row.has_cinnamon,
                milk_extra_id: row.milk_extra_id.map(ExtraId::new),
                syrup_extra_id: row.syrup_extra_id.map(ExtraId::new),
                has_condensed_milk: row.has_condensed_milk,
            },
            unit_price: row.unit_price,
            extras_price: row.extras_price,
        }
    }
}

/// One line of an order about to be placed, with prices already computed
/// and frozen by the caller.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub options: LineOptions,
    pub unit_price: Decimal,
    pub extras_price: Decimal,
    /// Whether placement must decrement this product's stock.
    pub stock_managed: bool,
}

/// An order together with its lines, for history views.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

/// Repository for orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order atomically.
    ///
    /// Inserts the order header and its lines, decrements stock for every
    /// stock-managed line with a guarded update, and empties the user's
    /// cart. Any failure rolls the whole transaction back.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a stock-managed product no
    /// longer has enough stock at commit time, or
    /// `RepositoryError::Database` on any other failure.
    pub async fn place(
        &self,
        user_id: UserId,
        total_price: Decimal,
        lines: &[NewOrderLine],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            "INSERT INTO orders (user_id, total_price, status) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id.as_i32())
        .bind(total_price)
        .bind(OrderStatus::default().as_str())
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO order_lines \
                     (order_id, product_id, quantity, sugar_quantity, \
                      has_cinnamon, milk_extra_id, syrup_extra_id, \
                      has_condensed_milk, unit_price, extras_price) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(order_id)
            .bind(line.product_id.as_i32())
            .bind(line.quantity)
            .bind(line.options.sugar_quantity)
            .bind(line.options.has_cinnamon)
            .bind(line.options.milk_extra_id.map(|id| id.as_i32()))
            .bind(line.options.syrup_extra_id.map(|id| id.as_i32()))
            .bind(line.options.has_condensed_milk)
            .bind(line.unit_price)
            .bind(line.extras_price)
            .execute(&mut *tx)
            .await?;

            if line.stock_managed {
                // Guarded decrement: zero rows affected means someone else
                // took the last units since the cart was checked.
                let result = sqlx::query(
                    "UPDATE products SET stock_count = stock_count - $1 \
                     WHERE id = $2 AND stock_count >= $1",
                )
                .bind(line.quantity)
                .bind(line.product_id.as_i32())
                .execute(&mut *tx)
                .await?;
                if result.rows_affected() == 0 {
                    tx.rollback().await?;
                    return Err(RepositoryError::Conflict(format!(
                        "insufficient stock for product {}",
                        line.product_id
                    )));
                }
            }
        }

        sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(OrderId::new(order_id))
    }

    /// A user's orders, most recent first, each with its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored status is
    /// unrecognized.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithLines>, RepositoryError> {
        let order_rows: Vec<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, total_price, status, created_at \
             FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = order_rows.iter().map(|row| row.id).collect();
        let line_rows: Vec<OrderLineRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, quantity, sugar_quantity, \
                    has_cinnamon, milk_extra_id, syrup_extra_id, \
                    has_condensed_milk, unit_price, extras_price \
             FROM order_lines WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(order_rows.len());
        for row in order_rows {
            let order = Order::try_from(row)?;
            let lines = line_rows
                .iter()
                .filter(|line| line.order_id == order.id.as_i32())
                .cloned()
                .map(Into::into)
                .collect();
            orders.push(OrderWithLines { order, lines });
        }
        Ok(orders)
    }

    /// One order by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored status is
    /// unrecognized.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, user_id, total_price, status, created_at \
             FROM orders WHERE id = $1 AND user_id = $2",
        )
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        row.map(Order::try_from).transpose()
    }
}
