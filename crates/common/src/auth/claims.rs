//! Canonical claim mapping
//!
//! Callers hand claims over in whatever structured form they have them in;
//! [`ClaimSet::from_value`] adapts record-like inputs into the one canonical
//! mapping at the boundary so the issuer never branches on shape.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::AuthError;

/// Seconds a token stays valid when the claim set carries no expiration.
pub(crate) const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Ordered mapping of JWT claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Create an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapt a structured value into a claim set.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingConfig`] if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, AuthError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(AuthError::MissingConfig("payload")),
        }
    }

    /// Adapt any serializable record into a claim set.
    ///
    /// # Errors
    /// Returns [`AuthError::MissingConfig`] if the record does not serialize
    /// to a JSON object.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, AuthError> {
        let value =
            serde_json::to_value(record).map_err(|_| AuthError::MissingConfig("payload"))?;
        Self::from_value(value)
    }

    /// Insert or replace a claim.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up a claim by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Claim value as a string, if present and textual.
    #[must_use]
    pub fn str_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Claim value as an integer, if present and numeric.
    #[must_use]
    pub fn int_claim(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Expiration claim (`exp`) as epoch seconds, if set.
    #[must_use]
    pub fn expiration(&self) -> Option<i64> {
        self.int_claim("exp")
    }

    /// Whether the set carries no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying mapping.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Finalize the registered claims ahead of signing.
    ///
    /// Caller-supplied claims stay underneath; the computed registered claims
    /// win on conflict:
    /// - `iss` and `sub` are required
    /// - `iat` defaults to `now`
    /// - `nbf` stays only when supplied as a number
    /// - `exp` defaults to `now + 3600s`
    ///
    /// # Errors
    /// Returns [`AuthError::MissingConfig`] when issuer or subject cannot be
    /// derived.
    pub fn finalized(mut self, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let issuer = self
            .get("iss")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or(AuthError::MissingConfig("payload.issuer"))?;
        let subject = self
            .get("sub")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or(AuthError::MissingConfig("payload.subject"))?;

        let issued_at = self.int_claim("iat").unwrap_or_else(|| now.timestamp());
        let not_before = self.int_claim("nbf");
        let expiration =
            self.int_claim("exp").unwrap_or(now.timestamp() + DEFAULT_TOKEN_LIFETIME_SECS);

        self.insert("iss", issuer);
        self.insert("sub", subject);
        self.insert("iat", issued_at);
        if let Some(nbf) = not_before {
            self.insert("nbf", nbf);
        }
        self.insert("exp", expiration);

        Ok(self)
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
