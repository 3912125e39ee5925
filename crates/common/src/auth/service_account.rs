//! Service-account identity
//!
//! Loads identity attributes and key material from a service-account
//! credential file and mints scope-bound bearer tokens through
//! [`TokenIssuer`]. Scope variants are derived with
//! [`ServiceAccount::with_scopes`]: same scope set returns the same instance,
//! a different set returns a structural copy with a cleared token cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::claims::ClaimSet;
use super::errors::AuthError;
use super::token::TokenIssuer;
use crate::time::{Clock, SystemClock};

/// Environment variable consulted when no credential path is given.
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Expected `type` marker in the credential document.
const SERVICE_ACCOUNT_TYPE: &str = "service_account";

/// Fixed lifetime of scope-bound tokens.
const SCOPE_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Parsed service-account credential document.
///
/// Only the known keys below are stored; anything else in the document is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
struct ServiceAccountKey {
    #[serde(rename = "type")]
    key_type: Option<String>,
    project_id: Option<String>,
    private_key_id: Option<String>,
    private_key: Option<String>,
    public_key: Option<String>,
    client_email: Option<String>,
    client_id: Option<String>,
    auth_uri: Option<String>,
    token_uri: Option<String>,
    auth_provider_x509_cert_url: Option<String>,
    client_x509_cert_url: Option<String>,
    universe_domain: Option<String>,
}

/// A non-human principal: credential key material plus project id, client
/// email and an ordered scope list.
///
/// The client email serves as both token issuer and subject. Tokens are
/// minted per scope set with a fixed one-hour lifetime.
pub struct ServiceAccount {
    key: ServiceAccountKey,
    scopes: Option<Vec<String>>,
    issuer: TokenIssuer,
}

impl ServiceAccount {
    /// Load from the path named by [`CREDENTIALS_ENV_VAR`].
    ///
    /// # Errors
    /// Returns [`AuthError::CredentialsNotFound`] when the variable is unset
    /// or the file is missing, plus the errors of [`Self::from_file`].
    pub fn from_env() -> Result<Arc<Self>, AuthError> {
        Self::from_env_with_clock(Arc::new(SystemClock))
    }

    /// Like [`Self::from_env`] with an injected clock.
    ///
    /// # Errors
    /// Same as [`Self::from_env`].
    pub fn from_env_with_clock(clock: Arc<dyn Clock>) -> Result<Arc<Self>, AuthError> {
        let path = std::env::var(CREDENTIALS_ENV_VAR)
            .map_err(|_| AuthError::CredentialsNotFound(PathBuf::from(CREDENTIALS_ENV_VAR)))?;
        Self::from_file_with_clock(path, clock)
    }

    /// Load a service-account credential file.
    ///
    /// # Errors
    /// - [`AuthError::CredentialsNotFound`] when the path does not resolve
    /// - [`AuthError::CredentialsRead`] when the content cannot be loaded
    /// - [`AuthError::InvalidServiceAccount`] when the document does not
    ///   parse or its declared type is not `service_account`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Arc<Self>, AuthError> {
        Self::from_file_with_clock(path, Arc::new(SystemClock))
    }

    /// Like [`Self::from_file`] with an injected clock.
    ///
    /// # Errors
    /// Same as [`Self::from_file`].
    pub fn from_file_with_clock(
        path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> Result<Arc<Self>, AuthError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AuthError::CredentialsNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|source| AuthError::CredentialsRead { path: path.to_path_buf(), source })?;

        let key: ServiceAccountKey = serde_json::from_str(&content)
            .map_err(|e| AuthError::InvalidServiceAccount(e.to_string()))?;
        if key.key_type.as_deref() != Some(SERVICE_ACCOUNT_TYPE) {
            return Err(AuthError::InvalidServiceAccount(format!(
                "expected document type {SERVICE_ACCOUNT_TYPE:?}"
            )));
        }

        let mut builder = TokenIssuer::builder().clock(clock);
        if let Some(key_id) = &key.private_key_id {
            builder = builder.key_id(key_id);
        }
        if let Some(private_key) = &key.private_key {
            builder = builder.private_key(private_key);
        }
        if let Some(public_key) = &key.public_key {
            builder = builder.public_key(public_key);
        }

        debug!(
            project_id = key.project_id.as_deref().unwrap_or(""),
            client_email = key.client_email.as_deref().unwrap_or(""),
            "loaded service account credentials"
        );

        Ok(Arc::new(Self { key, scopes: Some(Vec::new()), issuer: builder.build() }))
    }

    /// Project the credential belongs to.
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.key.project_id.as_deref()
    }

    /// Client email; used as both token issuer and subject.
    #[must_use]
    pub fn client_email(&self) -> Option<&str> {
        self.key.client_email.as_deref()
    }

    /// OAuth client id from the credential document.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.key.client_id.as_deref()
    }

    /// Token endpoint from the credential document.
    #[must_use]
    pub fn token_uri(&self) -> Option<&str> {
        self.key.token_uri.as_deref()
    }

    /// Current scope list; `None` means unset (distinct from empty).
    #[must_use]
    pub fn scopes(&self) -> Option<&[String]> {
        self.scopes.as_deref()
    }

    /// The underlying token issuer (cache + key material).
    #[must_use]
    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Whether every requested scope is already present.
    #[must_use]
    pub fn has_scopes(&self, scopes: &[&str]) -> bool {
        let current = self.scopes.as_deref().unwrap_or_default();
        scopes.iter().all(|scope| current.iter().any(|s| s == scope))
    }

    /// Derive a variant bound to exactly the requested scopes.
    ///
    /// When the requested set is already covered the original instance is
    /// returned unchanged, cache intact. Otherwise the result is a structural
    /// copy whose cached token and expiry are cleared and whose scope list is
    /// replaced (not unioned) — never a copy sharing cache state with its
    /// source.
    #[must_use]
    pub fn with_scopes(self: &Arc<Self>, scopes: &[&str]) -> Arc<Self> {
        if self.has_scopes(scopes) {
            return Arc::clone(self);
        }
        debug!(?scopes, "deriving scope-bound service account variant");
        Arc::new(Self {
            key: self.key.clone(),
            scopes: Some(scopes.iter().map(ToString::to_string).collect()),
            issuer: self.issuer.detached(),
        })
    }

    /// Return the cached scope-bound token while valid, otherwise mint a new
    /// one.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingConfig`] when the scope set is unset or
    /// the client email / private key is missing.
    pub fn token(&self) -> Result<String, AuthError> {
        self.issuer.token_with(|| self.scope_claims(self.issuer.clock().now()))
    }

    /// Force generation of a fresh scope-bound token.
    ///
    /// # Errors
    /// Same as [`Self::token`].
    pub fn generate_token(&self) -> Result<String, AuthError> {
        self.issuer.sign_and_cache(self.scope_claims(self.issuer.clock().now())?)
    }

    /// Claim builder for scope-bound tokens: issuer = subject = client
    /// email, issued-at = now, expiration fixed at now + 3600s, custom claim
    /// `scope` = space-joined scope list.
    fn scope_claims(&self, now: DateTime<Utc>) -> Result<ClaimSet, AuthError> {
        let scopes = self.scopes.as_ref().ok_or(AuthError::MissingConfig("payload.scopes"))?;
        let email =
            self.key.client_email.as_deref().ok_or(AuthError::MissingConfig("client_email"))?;

        let mut claims = ClaimSet::new();
        claims
            .insert("iss", email)
            .insert("sub", email)
            .insert("iat", now.timestamp())
            .insert("exp", now.timestamp() + SCOPE_TOKEN_LIFETIME_SECS)
            .insert("scope", scopes.join(" "));
        Ok(claims)
    }
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("project_id", &self.key.project_id)
            .field("client_email", &self.key.client_email)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
