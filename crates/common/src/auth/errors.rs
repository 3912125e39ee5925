//! Credential subsystem error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading credentials or minting/verifying tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required signing material or claim input is missing.
    #[error("cannot generate token, {0} not set")]
    MissingConfig(&'static str),

    /// Credential file does not exist at the resolved path.
    #[error("credential file not found: {0}")]
    CredentialsNotFound(PathBuf),

    /// Credential file exists but could not be read.
    #[error("failed to read credential file {path}: {source}")]
    CredentialsRead {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Credential document is not a recognized service-account key.
    #[error("invalid service account key: {0}")]
    InvalidServiceAccount(String),

    /// Token decode requested without a configured public key.
    #[error("cannot decode token, public key not set")]
    PublicKeyNotSet,

    /// Private key material could not be loaded or the claim set could not
    /// be signed.
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Signature or format verification failed.
    #[error("token verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),

    /// RSA key generation or encoding failed.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}
