//! Order administration queries: dashboard tabs and status updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use demitasse_core::{OrderId, OrderLineId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{AdminOrder, AdminOrderLine, describe_options};

#[derive(Debug, sqlx::FromRow)]
struct OrderHeaderRow {
    id: i32,
    customer_name: String,
    customer_phone: String,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderLineRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    product_name: String,
    size_volume: Option<String>,
    quantity: i32,
    sugar_quantity: i16,
    has_cinnamon: bool,
    milk_name: Option<String>,
    syrup_name: Option<String>,
    has_condensed_milk: bool,
    unit_price: Decimal,
    extras_price: Decimal,
}

impl From<OrderLineRow> for AdminOrderLine {
    fn from(row: OrderLineRow) -> Self {
        let options_description = describe_options(
            row.sugar_quantity,
            row.has_cinnamon,
            row.milk_name.as_deref(),
            row.syrup_name.as_deref(),
            row.has_condensed_milk,
        );
        Self {
            id: OrderLineId::new(row.id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            size_volume: row.size_volume,
            quantity: row.quantity,
            options_description,
            unit_price: row.unit_price,
            extras_price: row.extras_price,
        }
    }
}

/// Repository for staff order management.
pub struct OrderAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderAdminRepository<'a> {
    /// Create a new order admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders in any of the given statuses, with customer info and
    /// resolved lines.
    ///
    /// `oldest_first` is used for the incoming queue so baristas work in
    /// arrival order; history tabs show newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails, or
    /// `RepositoryError::DataCorruption` if a stored status is
    /// unrecognized.
    pub async fn list_with_status(
        &self,
        statuses: &[OrderStatus],
        oldest_first: bool,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let status_names: Vec<String> =
            statuses.iter().map(|s| s.as_str().to_owned()).collect();
        let direction = if oldest_first { "ASC" } else { "DESC" };

        let sql = format!(
            "SELECT o.id, u.name AS customer_name, u.phone AS customer_phone, \
                    o.total_price, o.status, o.created_at \
             FROM orders o \
             JOIN users u ON u.id = o.user_id \
             WHERE o.status = ANY($1) \
             ORDER BY o.created_at {direction}, o.id {direction}"
        );
        let headers: Vec<OrderHeaderRow> = sqlx::query_as(&sql)
            .bind(&status_names)
            .fetch_all(self.pool)
            .await?;

        let ids: Vec<i32> = headers.iter().map(|row| row.id).collect();
        let line_rows: Vec<OrderLineRow> = sqlx::query_as(
            "SELECT l.id, l.order_id, l.product_id, p.name AS product_name, \
                    s.volume AS size_volume, l.quantity, l.sugar_quantity, \
                    l.has_cinnamon, m.name AS milk_name, y.name AS syrup_name, \
                    l.has_condensed_milk, l.unit_price, l.extras_price \
             FROM order_lines l \
             JOIN products p ON p.id = l.product_id \
             LEFT JOIN sizes s ON s.id = p.size_id \
             LEFT JOIN extras m ON m.id = l.milk_extra_id \
             LEFT JOIN extras y ON y.id = l.syrup_extra_id \
             WHERE l.order_id = ANY($1) ORDER BY l.id",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(headers.len());
        for header in headers {
            let status: OrderStatus = header.status.parse().map_err(|_| {
                RepositoryError::DataCorruption(format!(
                    "order {} has unknown status '{}'",
                    header.id, header.status
                ))
            })?;
            let lines = line_rows
                .iter()
                .filter(|line| line.order_id == header.id)
                .cloned()
                .map(Into::into)
                .collect();
            orders.push(AdminOrder {
                id: OrderId::new(header.id),
                customer_name: header.customer_name,
                customer_phone: header.customer_phone,
                total_price: header.total_price,
                status,
                allowed_transitions: status.allowed_transitions().to_vec(),
                created_at: header.created_at,
                lines,
            });
        }
        Ok(orders)
    }

    /// Current status of one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if the stored status is
    /// unrecognized.
    pub async fn get_status(
        &self,
        id: OrderId,
    ) -> Result<Option<(OrderStatus, UserId)>, RepositoryError> {
        let row: Option<(String, i32)> =
            sqlx::query_as("SELECT status, user_id FROM orders WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        match row {
            Some((raw, user_id)) => {
                let status = raw.parse().map_err(|_| {
                    RepositoryError::DataCorruption(format!(
                        "order {id} has unknown status '{raw}'"
                    ))
                })?;
                Ok(Some((status, UserId::new(user_id))))
            }
            None => Ok(None),
        }
    }

    /// Persist a status change, guarded against concurrent writers.
    ///
    /// The update only lands while the order still carries `from`, so two
    /// staff racing on the same order cannot stack transitions the state
    /// machine never validated. Returns whether the row was updated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2 AND status = $3")
                .bind(to.as_str())
                .bind(id.as_i32())
                .bind(from.as_str())
                .execute(self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
