//! Home page and health check handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::{CurrentUser, catalog::Category};
use crate::services::catalog::ProductGroup;
use crate::state::AppState;

/// Home page props.
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub featured: Vec<ProductGroup>,
    pub categories: Vec<Category>,
    pub user: Option<CurrentUser>,
}

/// Home page: a cached random selection of available menu entries.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Json<HomePage>> {
    let featured = state.featured().await?;
    let categories = crate::db::CatalogRepository::new(state.pool())
        .list_categories()
        .await?;

    Ok(Json(HomePage {
        featured: featured.as_ref().clone(),
        categories,
        user,
    }))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
