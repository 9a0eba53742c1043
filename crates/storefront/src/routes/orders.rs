//! Order placement handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use demitasse_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Successful placement response.
#[derive(Debug, Serialize)]
pub struct OrderPlaced {
    pub order_id: OrderId,
}

/// Turn the cart into an order.
#[instrument(skip(state, user))]
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<(StatusCode, Json<OrderPlaced>)> {
    let extras = state.extras().await?;
    let order_id = OrderService::new(state.pool())
        .place_order(user.id, &extras)
        .await?;
    Ok((StatusCode::CREATED, Json(OrderPlaced { order_id })))
}
