//! Topic-bound publisher
//!
//! Messages carrying a schedule time are routed through the task client as
//! deferred publish calls; the rest go out in a single immediate publish
//! request. Scheduled messages are dispatched before the immediate batch.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use foxcloud_common::ServiceAccount;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::PubsubError;
use super::message::PubsubMessage;
use crate::http::{decode_response, ApiError, HttpClient};
use crate::tasks::{ScheduleTime, TaskClient, TaskRequest};

/// OAuth scope required for publishing.
pub const ACCESS_SCOPE: &str = "https://www.googleapis.com/auth/pubsub";

/// Production endpoint; overridable for tests.
pub const DEFAULT_BASE_URL: &str = "https://pubsub.googleapis.com";

#[derive(Serialize)]
struct PublishBody {
    messages: Vec<WireMessage>,
}

#[derive(Serialize)]
struct WireMessage {
    data: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    attributes: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// Client bound to one topic.
#[derive(Debug, Clone)]
pub struct PublisherClient {
    account: Arc<ServiceAccount>,
    http: HttpClient,
    topic: String,
    task_client: Option<TaskClient>,
    encode: bool,
    base_url: String,
}

impl PublisherClient {
    /// Bind a publisher to a topic. The account is narrowed to
    /// [`ACCESS_SCOPE`].
    pub fn new(account: &Arc<ServiceAccount>, http: HttpClient, topic: impl Into<String>) -> Self {
        Self {
            account: account.with_scopes(&[ACCESS_SCOPE]),
            http,
            topic: topic.into(),
            task_client: None,
            encode: true,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Attach a task client so scheduled messages can be deferred.
    #[must_use]
    pub fn with_task_client(mut self, task_client: TaskClient) -> Self {
        self.task_client = Some(task_client);
        self
    }

    /// Control JSON encoding of payloads (enabled by default). When disabled,
    /// string payloads are sent verbatim instead of as JSON string literals.
    #[must_use]
    pub fn with_encode(mut self, encode: bool) -> Self {
        self.encode = encode;
        self
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a message for this publisher.
    pub fn create_message(
        &self,
        data: Value,
        attributes: HashMap<String, String>,
        schedule_time: Option<ScheduleTime>,
    ) -> PubsubMessage {
        PubsubMessage::new(data, attributes, schedule_time)
    }

    /// Publish a batch.
    ///
    /// Messages with a schedule time become one deferred task each and are
    /// handed to the task client first; the remainder is sent in one
    /// immediate publish call. An all-scheduled batch sends no immediate
    /// request. Returns the message ids assigned to the immediate batch.
    ///
    /// # Errors
    /// - [`PubsubError::TaskClientNotConfigured`] when the batch contains a
    ///   scheduled message and no task client is attached; detected before
    ///   any network traffic
    /// - [`PubsubError::Task`] when deferred dispatch fails
    /// - [`PubsubError::Api`] for config, transport, remote or decode
    ///   failures of the immediate call
    pub async fn publish(&self, messages: Vec<PubsubMessage>) -> Result<Vec<String>, PubsubError> {
        let (scheduled, immediate): (Vec<_>, Vec<_>) =
            messages.into_iter().partition(|m| m.schedule_time.is_some());

        if !scheduled.is_empty() && self.task_client.is_none() {
            return Err(PubsubError::TaskClientNotConfigured);
        }

        debug!(
            topic = %self.topic,
            scheduled = scheduled.len(),
            immediate = immediate.len(),
            "publishing batch"
        );

        for message in scheduled {
            self.defer(message).await?;
        }

        if immediate.is_empty() {
            return Ok(Vec::new());
        }

        let body = PublishBody {
            messages: immediate.into_iter().map(|m| self.encode_message(m)).collect(),
        };
        let token = self.account.token().map_err(ApiError::from)?;
        let url = self.publish_url()?;
        let response =
            self.http.send(self.http.request(Method::POST, &url).bearer_auth(token).json(&body)).await?;
        let decoded: PublishResponse = decode_response(response).await?;
        Ok(decoded.message_ids)
    }

    /// Hand one scheduled message to the task client as a deferred publish
    /// call against this topic.
    async fn defer(&self, mut message: PubsubMessage) -> Result<(), PubsubError> {
        // Presence checked by the caller.
        let Some(task_client) = &self.task_client else {
            return Err(PubsubError::TaskClientNotConfigured);
        };
        let Some(schedule_time) = message.schedule_time.take() else {
            return Ok(());
        };

        let token = self.account.token().map_err(ApiError::from)?;
        let body = PublishBody { messages: vec![self.encode_message(message)] };
        let request = TaskRequest::new(self.publish_url()?)
            .with_method("POST")
            .with_headers(HashMap::from([
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), format!("Bearer {token}")),
            ]))
            .with_body(BASE64.encode(serde_json::to_string(&body).map_err(|e| ApiError::Decode(e.to_string()))?))
            .with_schedule_time(schedule_time);

        task_client.create_task(request).await?;
        Ok(())
    }

    fn encode_message(&self, message: PubsubMessage) -> WireMessage {
        let raw = match (&message.data, self.encode) {
            (Value::String(s), false) => s.clone(),
            (data, _) => data.to_string(),
        };
        WireMessage { data: BASE64.encode(raw), attributes: message.attributes }
    }

    fn publish_url(&self) -> Result<String, ApiError> {
        let project = self
            .account
            .project_id()
            .ok_or_else(|| ApiError::Config("service account has no project id".to_string()))?;
        Ok(format!("{}/v1/projects/{}/topics/{}:publish", self.base_url, project, self.topic))
    }
}
