//! Log-name-bound entry writer

use std::collections::HashMap;
use std::sync::Arc;

use foxcloud_common::{Clock, ServiceAccount, SystemClock};
use reqwest::Method;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::severity::Severity;
use crate::http::{decode_response, ApiError, HttpClient};

/// OAuth scope required for writing entries.
pub const ACCESS_SCOPE: &str = "https://www.googleapis.com/auth/logging.write";

/// Production endpoint; overridable for tests.
pub const DEFAULT_BASE_URL: &str = "https://logging.googleapis.com";

/// Wire format for entry timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Writes structured entries to one named log.
///
/// Base labels set at construction are attached to every entry; per-call
/// labels are merged on top.
#[derive(Debug, Clone)]
pub struct CloudLogger {
    account: Arc<ServiceAccount>,
    http: HttpClient,
    log_name: String,
    labels: HashMap<String, String>,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl CloudLogger {
    /// Bind a logger to a log name. The account is narrowed to
    /// [`ACCESS_SCOPE`].
    pub fn new(
        account: &Arc<ServiceAccount>,
        http: HttpClient,
        log_name: impl Into<String>,
        labels: HashMap<String, String>,
    ) -> Self {
        Self {
            account: account.with_scopes(&[ACCESS_SCOPE]),
            http,
            log_name: log_name.into(),
            labels,
            clock: Arc::new(SystemClock),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Inject a clock for entry timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// A sibling logger writing to a different log name with its own base
    /// labels, sharing credentials and transport.
    #[must_use]
    pub fn with(&self, log_name: impl Into<String>, labels: HashMap<String, String>) -> Self {
        Self {
            account: Arc::clone(&self.account),
            http: self.http.clone(),
            log_name: log_name.into(),
            labels,
            clock: Arc::clone(&self.clock),
            base_url: self.base_url.clone(),
        }
    }

    /// Write one entry.
    ///
    /// The payload is the context object with `message` merged in; per-call
    /// labels are merged over the base labels.
    ///
    /// # Errors
    /// Returns [`ApiError`] for config, transport, remote or decode
    /// failures.
    pub async fn log(
        &self,
        severity: Severity,
        message: &str,
        context: Map<String, Value>,
        labels: HashMap<String, String>,
    ) -> Result<(), ApiError> {
        let project = self
            .account
            .project_id()
            .ok_or_else(|| ApiError::Config("service account has no project id".to_string()))?;

        let mut payload = context;
        payload.insert("message".to_string(), Value::String(message.to_string()));

        let mut merged_labels = self.labels.clone();
        merged_labels.extend(labels);

        let entry = json!({
            "logName": format!("projects/{project}/logs/{}", self.log_name),
            "resource": {"type": "global"},
            "severity": severity.as_str(),
            "timestamp": self.clock.now().format(TIMESTAMP_FORMAT).to_string(),
            "jsonPayload": payload,
            "labels": merged_labels,
        });

        debug!(log_name = %self.log_name, severity = severity.as_str(), "writing log entry");
        let token = self.account.token()?;
        let url = format!("{}/v2/entries:write", self.base_url);
        let response = self
            .http
            .send(
                self.http
                    .request(Method::POST, &url)
                    .bearer_auth(token)
                    .json(&json!({"entries": [entry]})),
            )
            .await?;
        let _: Value = decode_response(response).await?;
        Ok(())
    }

    /// Write a `DEBUG` entry.
    ///
    /// # Errors
    /// Same as [`Self::log`].
    pub async fn debug(&self, message: &str, context: Map<String, Value>) -> Result<(), ApiError> {
        self.log(Severity::Debug, message, context, HashMap::new()).await
    }

    /// Write an `INFO` entry.
    ///
    /// # Errors
    /// Same as [`Self::log`].
    pub async fn info(&self, message: &str, context: Map<String, Value>) -> Result<(), ApiError> {
        self.log(Severity::Info, message, context, HashMap::new()).await
    }

    /// Write a `WARNING` entry.
    ///
    /// # Errors
    /// Same as [`Self::log`].
    pub async fn warn(&self, message: &str, context: Map<String, Value>) -> Result<(), ApiError> {
        self.log(Severity::Warning, message, context, HashMap::new()).await
    }

    /// Write an `ERROR` entry.
    ///
    /// # Errors
    /// Same as [`Self::log`].
    pub async fn error(&self, message: &str, context: Map<String, Value>) -> Result<(), ApiError> {
        self.log(Severity::Error, message, context, HashMap::new()).await
    }
}
