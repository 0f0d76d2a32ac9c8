// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use watchdeck_core::{CalendarError, StoreError};
use watchdeck_db::DbError;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("month out of range: {0}")]
    InvalidMonth(u32),

    #[error("authentication required")]
    Unauthenticated,

    #[error("activity store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("database error: {0}")]
    Database(#[from] DbError),

    #[error("watch history requires a persistent store")]
    HistoryUnavailable,

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::InvalidMonth { month } => ApiError::InvalidMonth(month),
            CalendarError::YearOutOfRange { year } => {
                ApiError::BadRequest(format!("year not representable: {}", year))
            }
            CalendarError::Store(e) => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::InvalidMonth(month) => {
                tracing::warn!(month, "Invalid month in calendar request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details(
                        "Invalid month",
                        format!("month must be 1-12, got {}", month),
                    ),
                )
            }
            ApiError::Unauthenticated => {
                tracing::warn!("Request without a resolvable identity");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Authentication required"),
                )
            }
            // Store and database failures are server-side conditions; the
            // client gets a generic body, the detail goes to the log.
            ApiError::Store(store_err) => {
                tracing::error!(error = %store_err, "Activity store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
            ApiError::Database(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
            ApiError::HistoryUnavailable => {
                tracing::warn!("History write attempted with no store configured");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::with_details(
                        "Watch history unavailable",
                        "no persistent store is configured",
                    ),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
