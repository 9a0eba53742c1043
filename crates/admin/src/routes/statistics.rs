//! Statistics dashboard handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::StatsRepository;
use crate::db::stats::{
    CategoryRevenue, OrderCounts, PeakHour, PopularExtra, RevenueSummary, TopProduct,
};
use crate::error::Result;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// The whole statistics page payload.
#[derive(Debug, Serialize)]
pub struct StatisticsPage {
    pub order_counts: OrderCounts,
    pub revenue: RevenueSummary,
    pub top_products_by_units: Vec<TopProduct>,
    pub top_products_by_revenue: Vec<TopProduct>,
    pub category_revenue: Vec<CategoryRevenue>,
    pub popular_extras: Vec<PopularExtra>,
    pub peak_hours: Vec<PeakHour>,
}

/// Sales and volume dashboard.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<StatisticsPage>> {
    let repo = StatsRepository::new(state.pool());

    Ok(Json(StatisticsPage {
        order_counts: repo.order_counts().await?,
        revenue: repo.revenue_summary().await?,
        top_products_by_units: repo.top_products(false).await?,
        top_products_by_revenue: repo.top_products(true).await?,
        category_revenue: repo.category_revenue().await?,
        popular_extras: repo.popular_extras().await?,
        peak_hours: repo.peak_hours().await?,
    }))
}
