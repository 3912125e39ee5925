//! Subscription-bound pull and acknowledge
//!
//! Pulled payloads are base64-decoded and, unless decoding is disabled,
//! parsed as JSON. Acknowledge accepts raw ids, pulled messages or untyped
//! records; every target must resolve to an id before anything is sent.

use std::collections::HashMap;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use foxcloud_common::ServiceAccount;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::PubsubError;
use super::message::PubsubMessage;
use super::publisher::{ACCESS_SCOPE, DEFAULT_BASE_URL};
use crate::http::{decode_response, ApiError, HttpClient};
use crate::tasks::ScheduleTime;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PullBody {
    max_messages: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullResponse {
    #[serde(default)]
    received_messages: Vec<ReceivedMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceivedMessage {
    #[serde(default)]
    ack_id: Option<String>,
    #[serde(default)]
    message: WireMessage,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage {
    #[serde(default)]
    data: String,
    #[serde(default)]
    attributes: HashMap<String, String>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    publish_time: Option<String>,
    #[serde(default)]
    schedule_time: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcknowledgeBody {
    ack_ids: Vec<String>,
}

/// Something acknowledgeable: an id, a pulled message or an untyped record
/// carrying an `ackId` field.
#[derive(Debug, Clone)]
pub enum AckTarget {
    /// Bare acknowledge id.
    Id(String),
    /// Pulled message carrying its acknowledge id.
    Message(PubsubMessage),
    /// Untyped record with an `ackId` field.
    Record(Value),
}

impl AckTarget {
    fn resolve(&self) -> Result<String, PubsubError> {
        match self {
            Self::Id(id) => Ok(id.clone()),
            Self::Message(message) => {
                message.ack_id.clone().ok_or(PubsubError::AckIdNotFound)
            }
            Self::Record(record) => record
                .get("ackId")
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .ok_or(PubsubError::AckIdNotFound),
        }
    }
}

impl From<String> for AckTarget {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for AckTarget {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<PubsubMessage> for AckTarget {
    fn from(message: PubsubMessage) -> Self {
        Self::Message(message)
    }
}

impl From<Value> for AckTarget {
    fn from(record: Value) -> Self {
        Self::Record(record)
    }
}

/// Client bound to one subscription.
#[derive(Debug, Clone)]
pub struct SubscriberClient {
    account: Arc<ServiceAccount>,
    http: HttpClient,
    subscription: String,
    decode: bool,
    base_url: String,
}

impl SubscriberClient {
    /// Bind a subscriber to a subscription. The account is narrowed to
    /// [`ACCESS_SCOPE`].
    pub fn new(
        account: &Arc<ServiceAccount>,
        http: HttpClient,
        subscription: impl Into<String>,
    ) -> Self {
        Self {
            account: account.with_scopes(&[ACCESS_SCOPE]),
            http,
            subscription: subscription.into(),
            decode: true,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Control JSON decoding of pulled payloads (enabled by default). When
    /// disabled, payloads surface as plain strings.
    #[must_use]
    pub fn with_decode(mut self, decode: bool) -> Self {
        self.decode = decode;
        self
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Pull up to `max_messages` from the subscription.
    ///
    /// An empty subscription yields an empty vector. Payloads that fail JSON
    /// decoding surface with a null payload rather than failing the whole
    /// pull.
    ///
    /// # Errors
    /// - [`PubsubError::Api`] for config, transport, remote or decode
    ///   failures, including payloads that are not valid base64
    pub async fn pull(&self, max_messages: u32) -> Result<Vec<PubsubMessage>, PubsubError> {
        let token = self.account.token().map_err(ApiError::from)?;
        let url = self.subscription_url("pull")?;
        debug!(subscription = %self.subscription, max_messages, "pulling messages");

        let response = self
            .http
            .send(
                self.http
                    .request(Method::POST, &url)
                    .bearer_auth(token)
                    .json(&PullBody { max_messages }),
            )
            .await?;
        let decoded: PullResponse = decode_response(response).await?;

        decoded.received_messages.into_iter().map(|m| self.decode_received(m)).collect()
    }

    /// Acknowledge a batch of targets.
    ///
    /// All targets are resolved to acknowledge ids before anything is sent;
    /// one unresolvable target aborts the whole call. An empty batch sends
    /// nothing.
    ///
    /// # Errors
    /// - [`PubsubError::AckIdNotFound`] when a target carries no id;
    ///   detected before any network traffic
    /// - [`PubsubError::Api`] for config, transport, remote or decode
    ///   failures
    pub async fn ack(&self, targets: Vec<AckTarget>) -> Result<(), PubsubError> {
        let ack_ids = targets.iter().map(AckTarget::resolve).collect::<Result<Vec<_>, _>>()?;
        if ack_ids.is_empty() {
            return Ok(());
        }

        let token = self.account.token().map_err(ApiError::from)?;
        let url = self.subscription_url("acknowledge")?;
        debug!(subscription = %self.subscription, count = ack_ids.len(), "acknowledging messages");

        let response = self
            .http
            .send(
                self.http
                    .request(Method::POST, &url)
                    .bearer_auth(token)
                    .json(&AcknowledgeBody { ack_ids }),
            )
            .await?;
        let _: Value = decode_response(response).await?;
        Ok(())
    }

    fn decode_received(&self, received: ReceivedMessage) -> Result<PubsubMessage, PubsubError> {
        let raw = BASE64
            .decode(received.message.data.as_bytes())
            .map_err(|e| ApiError::Decode(format!("message data is not valid base64: {e}")))?;
        let text = String::from_utf8(raw)
            .map_err(|e| ApiError::Decode(format!("message data is not valid UTF-8: {e}")))?;

        let data = if self.decode {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, "pulled payload is not valid JSON, surfacing null");
                Value::Null
            })
        } else {
            Value::String(text)
        };

        Ok(PubsubMessage {
            data,
            attributes: received.message.attributes,
            ack_id: received.ack_id,
            message_id: received.message.message_id,
            publish_time: received.message.publish_time,
            schedule_time: received.message.schedule_time.map(ScheduleTime::Timestamp),
        })
    }

    fn subscription_url(&self, action: &str) -> Result<String, ApiError> {
        let project = self
            .account
            .project_id()
            .ok_or_else(|| ApiError::Config("service account has no project id".to_string()))?;
        Ok(format!(
            "{}/v1/projects/{}/subscriptions/{}:{}",
            self.base_url, project, self.subscription, action
        ))
    }
}
