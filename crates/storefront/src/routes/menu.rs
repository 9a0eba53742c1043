//! Menu page handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::Result;
use crate::models::catalog::Category;
use crate::services::catalog::{self, ProductGroup};
use crate::state::AppState;

/// One category's slice of the menu.
#[derive(Debug, Serialize)]
pub struct MenuSection {
    pub category: Category,
    pub entries: Vec<ProductGroup>,
}

/// Full menu, variations collapsed into entries, grouped by category.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<MenuSection>>> {
    let repo = CatalogRepository::new(state.pool());
    let categories = repo.list_categories().await?;
    let products = repo.list_products().await?;
    let groups = catalog::group_products(&products);

    let sections = categories
        .into_iter()
        .map(|category| MenuSection {
            entries: catalog::groups_in_category(&groups, category.id),
            category,
        })
        .collect();

    Ok(Json(sections))
}
