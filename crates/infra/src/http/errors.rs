//! HTTP-layer error types

use foxcloud_common::auth::AuthError;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Response body carried a recognized error shape.
    #[error("remote API error {status}: {message}")]
    Remote {
        /// Server-reported status text (e.g. `PERMISSION_DENIED`).
        status: String,
        /// Server-reported message.
        message: String,
        /// Numeric error code when present.
        code: i64,
        /// Structured details when present.
        details: Option<Value>,
    },

    /// Transport-level failure, distinguishable from an error body.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Client-side configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential subsystem failure while authorizing the call.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),
}
