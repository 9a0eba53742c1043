//! Reporting queries for the statistics dashboard.
//!
//! Counts include every non-cancelled order. Money figures only include
//! orders that were actually paid out, Completed or Received.

use rust_decimal::Decimal;
use sqlx::PgPool;

use demitasse_core::{CategoryId, ExtraId, OrderStatus, ProductId};

use super::RepositoryError;

/// Statuses that count as real (non-cancelled) orders.
const NON_CANCELLED: [OrderStatus; 4] = [
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::Completed,
    OrderStatus::Received,
];

/// Statuses whose money counts as revenue.
const REVENUE: [OrderStatus; 2] = [OrderStatus::Completed, OrderStatus::Received];

/// How many rows the top-N panels show.
const TOP_LIMIT: i64 = 10;

fn names(statuses: &[OrderStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_owned()).collect()
}

/// Order counts per period, non-cancelled orders only.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct OrderCounts {
    pub today: i64,
    pub week: i64,
    pub month: i64,
    pub all_time: i64,
}

/// Revenue per period plus the average check, paid orders only.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RevenueSummary {
    pub today: Decimal,
    pub week: Decimal,
    pub month: Decimal,
    pub all_time: Decimal,
    pub average_check: Decimal,
}

/// One row of the top-products panels.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub units: i64,
    pub revenue: Decimal,
}

/// Revenue attributed to one category.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CategoryRevenue {
    pub category_id: CategoryId,
    pub name: String,
    pub revenue: Decimal,
}

/// Usage count of one extra across ordered lines.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct PopularExtra {
    pub extra_id: ExtraId,
    pub name: String,
    pub uses: i64,
}

/// Orders placed during one hour of the day.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct PeakHour {
    pub hour: i32,
    pub orders: i64,
}

/// Repository for dashboard statistics.
pub struct StatsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StatsRepository<'a> {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Non-cancelled order counts for today, this week, this month, and
    /// all time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_counts(&self) -> Result<OrderCounts, RepositoryError> {
        let counts: OrderCounts = sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('day', now())) AS today, \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('week', now())) AS week, \
                COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now())) AS month, \
                COUNT(*) AS all_time \
             FROM orders WHERE status = ANY($1)",
        )
        .bind(names(&NON_CANCELLED))
        .fetch_one(self.pool)
        .await?;
        Ok(counts)
    }

    /// Revenue for the same periods plus the all-time average check.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn revenue_summary(&self) -> Result<RevenueSummary, RepositoryError> {
        let summary: RevenueSummary = sqlx::query_as(
            "SELECT \
                COALESCE(SUM(total_price) FILTER (WHERE created_at >= date_trunc('day', now())), 0) AS today, \
                COALESCE(SUM(total_price) FILTER (WHERE created_at >= date_trunc('week', now())), 0) AS week, \
                COALESCE(SUM(total_price) FILTER (WHERE created_at >= date_trunc('month', now())), 0) AS month, \
                COALESCE(SUM(total_price), 0) AS all_time, \
                COALESCE(ROUND(AVG(total_price), 2), 0) AS average_check \
             FROM orders WHERE status = ANY($1)",
        )
        .bind(names(&REVENUE))
        .fetch_one(self.pool)
        .await?;
        Ok(summary)
    }

    /// Best-selling products, ranked by units or by revenue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_products(
        &self,
        by_revenue: bool,
    ) -> Result<Vec<TopProduct>, RepositoryError> {
        let order_by = if by_revenue { "revenue" } else { "units" };
        let sql = format!(
            "SELECT l.product_id, p.name, \
                    SUM(l.quantity)::BIGINT AS units, \
                    SUM((l.unit_price + l.extras_price) * l.quantity) AS revenue \
             FROM order_lines l \
             JOIN orders o ON o.id = l.order_id \
             JOIN products p ON p.id = l.product_id \
             WHERE o.status = ANY($1) \
             GROUP BY l.product_id, p.name \
             ORDER BY {order_by} DESC LIMIT $2"
        );
        let rows: Vec<TopProduct> = sqlx::query_as(&sql)
            .bind(names(&REVENUE))
            .bind(TOP_LIMIT)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Revenue broken down by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_revenue(&self) -> Result<Vec<CategoryRevenue>, RepositoryError> {
        let rows: Vec<CategoryRevenue> = sqlx::query_as(
            "SELECT c.id AS category_id, c.name, \
                    COALESCE(SUM((l.unit_price + l.extras_price) * l.quantity), 0) AS revenue \
             FROM order_lines l \
             JOIN orders o ON o.id = l.order_id \
             JOIN products p ON p.id = l.product_id \
             JOIN categories c ON c.id = p.category_id \
             WHERE o.status = ANY($1) \
             GROUP BY c.id, c.name \
             ORDER BY revenue DESC",
        )
        .bind(names(&REVENUE))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Most-used extras, alternative milks and syrups pooled together.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn popular_extras(&self) -> Result<Vec<PopularExtra>, RepositoryError> {
        let rows: Vec<PopularExtra> = sqlx::query_as(
            "SELECT e.id AS extra_id, e.name, COUNT(*)::BIGINT AS uses \
             FROM ( \
                 SELECT milk_extra_id AS extra_id, order_id FROM order_lines \
                 WHERE milk_extra_id IS NOT NULL \
                 UNION ALL \
                 SELECT syrup_extra_id, order_id FROM order_lines \
                 WHERE syrup_extra_id IS NOT NULL \
             ) u \
             JOIN orders o ON o.id = u.order_id AND o.status = ANY($1) \
             JOIN extras e ON e.id = u.extra_id \
             GROUP BY e.id, e.name \
             ORDER BY uses DESC LIMIT $2",
        )
        .bind(names(&REVENUE))
        .bind(TOP_LIMIT)
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Order volume per hour of the day, for staffing decisions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn peak_hours(&self) -> Result<Vec<PeakHour>, RepositoryError> {
        let rows: Vec<PeakHour> = sqlx::query_as(
            "SELECT EXTRACT(HOUR FROM created_at)::INT AS hour, \
                    COUNT(*)::BIGINT AS orders \
             FROM orders WHERE status = ANY($1) \
             GROUP BY hour ORDER BY hour",
        )
        .bind(names(&NON_CANCELLED))
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
