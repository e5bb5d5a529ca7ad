use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use campus_db::StoreError;
use campus_types::api::ErrorResponse;

/// Request-level errors. Every variant is terminal for the request; nothing
/// is retried. The message is surfaced verbatim in a `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0} failed")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a store error onto the API taxonomy. `op` names the operation for
    /// the generic 500 message ("Check-in failed", "Update failed", ...);
    /// store details go to the log, never to the client.
    pub fn from_store(err: StoreError, op: &'static str) -> Self {
        match err {
            StoreError::UserNotFound => ApiError::NotFound("User not found"),
            StoreError::MissionNotFound => ApiError::NotFound("Mission not found"),
            StoreError::DuplicateCheckin => ApiError::Conflict("Already checked in today"),
            StoreError::AccountExists => ApiError::Conflict("Email or username already exists"),
            StoreError::Sqlite(_) | StoreError::LockPoisoned => {
                error!("{op} failed: {err}");
                ApiError::Internal(op)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
