//! Pub/Sub message model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tasks::ScheduleTime;

/// One message: structured payload, string attributes and, on pulled
/// messages, delivery metadata.
///
/// `ack_id`, `message_id` and `publish_time` are populated by the service on
/// pull; they are ignored on publish. A set `schedule_time` routes the
/// message through deferred dispatch instead of the immediate publish call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubsubMessage {
    /// Structured payload.
    #[serde(default)]
    pub data: Value,

    /// Flat string-to-string attributes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,

    /// Acknowledge id assigned on delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_id: Option<String>,

    /// Service-assigned message id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// When the service accepted the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,

    /// When set, the message is deferred rather than published immediately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_time: Option<ScheduleTime>,
}

impl PubsubMessage {
    /// A message ready to publish.
    pub fn new(
        data: Value,
        attributes: HashMap<String, String>,
        schedule_time: Option<ScheduleTime>,
    ) -> Self {
        Self { data, attributes, schedule_time, ..Self::default() }
    }
}
