//! Error types for playback and trace loading.

use algoviz_core::{TraceError, ValidationError};
use thiserror::Error;

use crate::controller::{Operation, Status};

/// Controller misuse. These are caller bugs and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("cannot {operation} while {status}")]
    InvalidTransition { operation: Operation, status: Status },

    #[error("playback speed must be a positive duration")]
    InvalidSpeed,

    /// The session task is gone (shut down or dropped).
    #[error("playback session is closed")]
    SessionClosed,
}

/// Why a remote trace could not be used.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("remote response parse failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("remote trace rejected: {0}")]
    Trace(#[from] TraceError),
}

/// Failure to produce any trace at all.
///
/// Remote problems never appear here; they fall back to local generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("local generation failed: {0}")]
    Local(TraceError),
}

impl From<TraceError> for LoadError {
    fn from(err: TraceError) -> Self {
        match err {
            TraceError::Validation(invalid) => LoadError::Invalid(invalid),
            other => LoadError::Local(other),
        }
    }
}
