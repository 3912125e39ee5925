//! Credential subsystem
//!
//! Issues and caches short-lived signed bearer tokens for a service identity:
//! - [`TokenIssuer`] — generic signer with an expiry-aware token cache
//! - [`ServiceAccount`] — identity loaded from a service-account credential
//!   file, with scope-bound derivation via [`ServiceAccount::with_scopes`]
//! - [`ClaimSet`] — the canonical claim mapping signed into tokens

mod claims;
mod errors;
mod service_account;
mod token;

pub use claims::ClaimSet;
pub use errors::AuthError;
pub use service_account::{ServiceAccount, CREDENTIALS_ENV_VAR};
pub use token::{TokenIssuer, TokenIssuerBuilder, EXPIRY_SAFETY_MARGIN_SECS};
