//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce a JSON body of the
//! form `{"success": false, "error": {"code": .., "message": ..}}`.

use algoviz_core::{TraceError, UnknownAlgorithm, ValidationError};
use algoviz_playback::{LoadError, PlaybackError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_FAILED").
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown algorithm or session (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Input rejected before any step was recorded (422).
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationError),

    /// Playback operation not allowed in the current state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Server is at a capacity limit (503).
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::ValidationFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let (message, details) = match &self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unavailable(msg)
            | ApiError::InternalError(msg) => (msg.clone(), None),
            ApiError::ValidationFailed(err) => (err.to_string(), validation_details(err)),
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%message, "request failed");
        }

        let body = serde_json::json!({
            "success": false,
            "error": ApiErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        });

        (status, axum::Json(body)).into_response()
    }
}

fn validation_details(err: &ValidationError) -> Option<serde_json::Value> {
    match err {
        ValidationError::InputMismatch {
            algorithm,
            expected,
            got,
        } => Some(serde_json::json!({
            "algorithm": algorithm,
            "expected": expected,
            "got": got,
        })),
        _ => None,
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationFailed(err)
    }
}

impl From<TraceError> for ApiError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Validation(invalid) => ApiError::ValidationFailed(invalid),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Invalid(invalid) => ApiError::ValidationFailed(invalid),
            LoadError::Local(trace) => ApiError::InternalError(trace.to_string()),
        }
    }
}

impl From<PlaybackError> for ApiError {
    fn from(err: PlaybackError) -> Self {
        match &err {
            PlaybackError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            PlaybackError::InvalidSpeed => ApiError::BadRequest(err.to_string()),
            PlaybackError::SessionClosed => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<UnknownAlgorithm> for ApiError {
    fn from(err: UnknownAlgorithm) -> Self {
        ApiError::NotFound(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoviz_playback::{Operation, Status};

    #[test]
    fn playback_errors_map_to_status_codes() {
        let conflict: ApiError = PlaybackError::InvalidTransition {
            operation: Operation::Pause,
            status: Status::Idle,
        }
        .into();
        assert_eq!(conflict.status_and_code().0, StatusCode::CONFLICT);

        let speed: ApiError = PlaybackError::InvalidSpeed.into();
        assert_eq!(speed.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_inside_trace_error_is_unprocessable() {
        let err: ApiError = TraceError::Validation(ValidationError::EmptyPattern).into();
        assert_eq!(err.status_and_code(), (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"));
        let err: ApiError = TraceError::Empty.into();
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn capacity_errors_are_unavailable() {
        let err = ApiError::Unavailable("session limit of 1 reached".to_string());
        assert_eq!(
            err.status_and_code(),
            (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
        );
    }
}
