//! Cart route handlers.
//!
//! All cart routes require a logged-in customer; guests get `401` from the
//! `RequireAuth` extractor.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use demitasse_core::{CartLineId, LineOptions, ProductId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::cart::{CartService, CartView};
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(flatten)]
    pub options: LineOptions,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub line_id: CartLineId,
    pub quantity: i32,
}

/// Options update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateOptionsForm {
    pub line_id: CartLineId,
    #[serde(flatten)]
    pub options: LineOptions,
}

/// Line removal request body.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub line_id: CartLineId,
}

/// Cart page: every line repriced against the current catalog.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartView>> {
    let extras = state.extras().await?;
    let view = CartService::new(state.pool()).view(user.id, &extras).await?;
    Ok(Json(view))
}

/// Add a product, merging with an identical existing line.
#[instrument(skip(state, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<AddForm>,
) -> Result<StatusCode> {
    let extras = state.extras().await?;
    CartService::new(state.pool())
        .add(user.id, form.product_id, form.quantity, form.options, &extras)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Change a line's quantity.
#[instrument(skip(state, user))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<UpdateForm>,
) -> Result<StatusCode> {
    CartService::new(state.pool())
        .update_quantity(user.id, form.line_id, form.quantity)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a line's option tuple.
#[instrument(skip(state, user))]
pub async fn update_options(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<UpdateOptionsForm>,
) -> Result<StatusCode> {
    let extras = state.extras().await?;
    CartService::new(state.pool())
        .update_options(user.id, form.line_id, form.options, &extras)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove one line.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<RemoveForm>,
) -> Result<StatusCode> {
    CartService::new(state.pool())
        .remove(user.id, form.line_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Empty the cart.
#[instrument(skip(state, user))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<StatusCode> {
    CartService::new(state.pool()).clear(user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
