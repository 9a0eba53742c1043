//! Stock management handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::StockRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::{RestockUndo, StockProduct, session_keys};
use crate::services::stock::{RestockRequest, StockService};
use crate::state::AppState;

/// Bulk restock request body.
#[derive(Debug, Deserialize)]
pub struct RestockForm {
    pub items: Vec<RestockRequest>,
}

/// Restock confirmation.
#[derive(Debug, Serialize)]
pub struct RestockApplied {
    /// Products whose stock actually changed.
    pub updated: usize,
    pub message: String,
}

/// The restock screen: every stock-managed product with its count.
#[instrument(skip(state, staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
) -> Result<Json<Vec<StockProduct>>> {
    let products = StockRepository::new(state.pool()).list_stock_managed().await?;
    Ok(Json(products))
}

/// Apply a bulk restock and remember it for one-step undo.
///
/// An effectively empty restock still replaces the undo buffer, so a
/// later undo cannot revert an older, unrelated restock.
#[instrument(skip(state, staff, session, form))]
pub async fn update_multiple(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    session: Session,
    Json(form): Json<RestockForm>,
) -> Result<Json<RestockApplied>> {
    let undo = StockService::new(state.pool()).restock(&form.items).await?;
    let updated = undo.entries.len();

    session
        .insert(session_keys::RESTOCK_UNDO, &undo)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    tracing::info!(staff_id = staff.id.as_i32(), updated, "stock updated");
    Ok(Json(RestockApplied {
        updated,
        message: format!("Updated stock for {updated} products"),
    }))
}

/// Undo the last restock made in this session.
#[instrument(skip(state, staff, session))]
pub async fn undo_last_update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    session: Session,
) -> Result<Json<RestockApplied>> {
    let undo: RestockUndo = session
        .get(session_keys::RESTOCK_UNDO)
        .await
        .map_err(|e| AppError::Internal(format!("session read failed: {e}")))?
        .unwrap_or_default();

    StockService::new(state.pool()).undo(&undo).await?;

    // One-step undo: consume the buffer
    session
        .remove::<RestockUndo>(session_keys::RESTOCK_UNDO)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))?;

    let updated = undo.entries.len();
    tracing::info!(staff_id = staff.id.as_i32(), updated, "stock restock undone");
    Ok(Json(RestockApplied {
        updated,
        message: format!("Reverted stock for {updated} products"),
    }))
}
