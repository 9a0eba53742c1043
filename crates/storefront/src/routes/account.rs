//! Account pages: profile and order history.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::{OrderWithLines, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Account overview props.
#[derive(Debug, Serialize)]
pub struct AccountPage {
    #[serde(flatten)]
    pub user: User,
}

/// Account overview.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AccountPage>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("account no longer exists".to_owned()))?;
    Ok(Json(AccountPage { user }))
}

/// Order history, most recent first, with frozen line prices.
#[instrument(skip(state, user))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderWithLines>>> {
    let history = OrderService::new(state.pool()).history(user.id).await?;
    Ok(Json(history))
}
