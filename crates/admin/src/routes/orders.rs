//! Order dashboard handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use demitasse_core::{OrderId, OrderStatus};

use crate::db::OrderAdminRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::AdminOrder;
use crate::state::AppState;

/// Dashboard tab.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Incoming queue, oldest first.
    #[default]
    New,
    /// Waiting for pickup, newest first.
    Ready,
    /// Finished orders of every terminal flavor, newest first.
    Completed,
}

impl Tab {
    /// Which statuses the tab shows.
    #[must_use]
    pub const fn statuses(self) -> &'static [OrderStatus] {
        match self {
            Self::New => &[OrderStatus::Preparing],
            Self::Ready => &[OrderStatus::Ready],
            Self::Completed => &[
                OrderStatus::Completed,
                OrderStatus::Received,
                OrderStatus::Cancelled,
            ],
        }
    }

    /// The incoming queue is worked in arrival order.
    #[must_use]
    pub const fn oldest_first(self) -> bool {
        matches!(self, Self::New)
    }
}

/// Query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    #[serde(default)]
    pub tab: Tab,
}

/// Status change request body.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
}

/// Status change confirmation.
#[derive(Debug, Serialize)]
pub struct StatusChanged {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub message: String,
}

/// Dashboard tab listing.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Query(query): Query<TabQuery>,
) -> Result<Json<Vec<AdminOrder>>> {
    let orders = OrderAdminRepository::new(state.pool())
        .list_with_status(query.tab.statuses(), query.tab.oldest_first())
        .await?;
    Ok(Json(orders))
}

/// Move an order to a new status, enforcing the state machine.
#[instrument(skip(state, staff))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<OrderId>,
    Json(form): Json<StatusForm>,
) -> Result<Json<StatusChanged>> {
    let repo = OrderAdminRepository::new(state.pool());
    let (current, _) = repo
        .get_status(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let status = current.transition_to(form.status)?;
    // Compare-and-swap: if another staff member moved the order after the
    // read above, nothing is written and the caller must retry.
    let updated = repo.update_status(id, current, status).await?;
    if !updated {
        return Err(AppError::Conflict(format!(
            "order {id} was updated by someone else"
        )));
    }

    tracing::info!(order_id = id.as_i32(), from = %current, to = %status, "order status changed");
    Ok(Json(StatusChanged {
        order_id: id,
        status,
        message: format!("Order #{id} is now {status}"),
    }))
}
