//! Pub/Sub error types

use thiserror::Error;

use crate::http::ApiError;
use crate::tasks::TaskError;

/// Errors surfaced by the publisher and subscriber clients.
#[derive(Debug, Error)]
pub enum PubsubError {
    /// An acknowledge target carried no acknowledge id.
    #[error("acknowledge id not found in message")]
    AckIdNotFound,

    /// A scheduled message was published without a task client attached.
    #[error("scheduled publish requires a task client; none is configured")]
    TaskClientNotConfigured,

    /// HTTP-layer failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Deferred dispatch failure.
    #[error(transparent)]
    Task(#[from] TaskError),
}
