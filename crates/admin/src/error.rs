//! Unified error handling for the admin service.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use demitasse_core::TransitionError;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::stock::StockError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Stock operation failed.
    #[error("Stock error: {0}")]
    Stock(#[from] StockError),

    /// Order status change not allowed by the state machine.
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// State changed underneath the request.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated as staff.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Stock(err) => match err {
                StockError::NothingToUndo | StockError::InvalidAmount => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                StockError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Transition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::Auth(AuthError::Repository(_)) | Self::Stock(StockError::Repository(_)) => {
                "Internal server error".to_owned()
            }
            Self::Auth(err) => err.to_string(),
            Self::Stock(err) => err.to_string(),
            Self::Transition(err) => err.to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use demitasse_core::OrderStatus;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_transition_rejection_is_unprocessable() {
        let err = OrderStatus::Completed
            .transition_to(OrderStatus::Preparing)
            .unwrap_err();
        assert_eq!(
            status_of(AppError::Transition(err)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_concurrent_change_is_conflict() {
        assert_eq!(
            status_of(AppError::Conflict("order status changed".to_owned())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_nothing_to_undo_is_unprocessable() {
        assert_eq!(
            status_of(AppError::Stock(StockError::NothingToUndo)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_auth_failure_is_unauthorized() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }
}
