//! Integration tests for the subscriber client against a mock endpoint.

#[path = "support.rs"]
mod support;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use foxcloud_infra::http::HttpClient;
use foxcloud_infra::pubsub::{AckTarget, PubsubError, SubscriberClient};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{fixed_clock, test_account};

const PULL_PATH: &str = "/v1/projects/demo-project/subscriptions/orders-sub:pull";
const ACK_PATH: &str = "/v1/projects/demo-project/subscriptions/orders-sub:acknowledge";

fn subscriber(server: &MockServer) -> SubscriberClient {
    let account = test_account(fixed_clock());
    SubscriberClient::new(&account, HttpClient::new().unwrap(), "orders-sub")
        .with_base_url(server.uri())
}

/// Validates `SubscriberClient::pull` behavior for the delivered batch
/// scenario.
///
/// Assertions:
/// - Confirms the request body carries `maxMessages`.
/// - Confirms payloads decode from base64 JSON into structured values.
/// - Confirms delivery metadata (ack id, message id, publish time) is
///   carried over.
#[tokio::test]
async fn test_pull_decodes_delivered_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PULL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "receivedMessages": [{
                "ackId": "ack-1",
                "message": {
                    "data": BASE64.encode(r#"{"qty": 3}"#),
                    "attributes": {"kind": "order"},
                    "messageId": "m-1",
                    "publishTime": "2030-01-01T00:00:00Z"
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = subscriber(&server).pull(10).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].data, json!({"qty": 3}));
    assert_eq!(messages[0].ack_id.as_deref(), Some("ack-1"));
    assert_eq!(messages[0].message_id.as_deref(), Some("m-1"));
    assert_eq!(messages[0].publish_time.as_deref(), Some("2030-01-01T00:00:00Z"));
    assert_eq!(messages[0].attributes.get("kind").map(String::as_str), Some("order"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"maxMessages": 10}));
}

/// Validates `SubscriberClient::pull` behavior for the empty subscription
/// scenario.
///
/// Assertions:
/// - Confirms a response without `receivedMessages` yields an empty vector.
#[tokio::test]
async fn test_pull_empty_subscription() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PULL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let messages = subscriber(&server).pull(10).await.unwrap();
    assert!(messages.is_empty());
}

/// Validates `SubscriberClient::ack` behavior for the resolved batch
/// scenario.
///
/// Assertions:
/// - Confirms one acknowledge request carries every resolved id, in order.
#[tokio::test]
async fn test_ack_sends_one_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ACK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    subscriber(&server)
        .ack(vec![
            AckTarget::from("ack-1"),
            AckTarget::from(json!({"ackId": "ack-2"})),
        ])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"ackIds": ["ack-1", "ack-2"]}));
}

/// Validates `SubscriberClient::ack` behavior for the empty batch scenario.
///
/// Assertions:
/// - Ensures an empty batch succeeds without any network traffic.
#[tokio::test]
async fn test_ack_empty_batch_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    subscriber(&server).ack(Vec::new()).await.unwrap();
}

/// Validates `SubscriberClient::ack` behavior for the unresolvable target
/// scenario.
///
/// Assertions:
/// - Ensures one target without an ack id aborts the whole call before any
///   network traffic.
#[tokio::test]
async fn test_ack_unresolvable_target_aborts_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let result = subscriber(&server)
        .ack(vec![AckTarget::from("ack-1"), AckTarget::from(json!({"other": true}))])
        .await;
    assert!(matches!(result, Err(PubsubError::AckIdNotFound)));
}
