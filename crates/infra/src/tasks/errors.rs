//! Cloud Tasks error types

use thiserror::Error;

use crate::http::ApiError;

/// Errors surfaced by the task client.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Schedule time has an unrecognized shape.
    #[error("invalid schedule time: {0}")]
    InvalidScheduleTime(String),

    /// HTTP-layer failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}
