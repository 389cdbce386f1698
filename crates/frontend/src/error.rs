//! Unified error handling with Sentry integration.
//!
//! Handlers that cannot recover return `Result<T, AppError>`. Recoverable
//! failures (backend errors during list or mutation) never reach this type;
//! the controllers turn them into alerts rendered on the page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-level error type for the frontend.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog backend could not answer a lookup. Carries the
    /// controller's generic message; details were logged where it failed.
    #[error("Backend unavailable: {0}")]
    Unavailable(&'static str),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Unavailable(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let message = match &self {
            Self::Unavailable(message) => (*message).to_string(),
            Self::NotFound(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
