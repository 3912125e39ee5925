//! Integration tests for the logging client against a mock endpoint.

#[path = "support.rs"]
mod support;

use foxcloud_infra::http::HttpClient;
use foxcloud_infra::logging::{CloudLogger, Severity};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{attributes, fixed_clock, test_account};

const WRITE_PATH: &str = "/v2/entries:write";

fn logger(server: &MockServer) -> CloudLogger {
    let clock = fixed_clock();
    let account = test_account(clock.clone());
    CloudLogger::new(
        &account,
        HttpClient::new().unwrap(),
        "app",
        attributes(&[("env", "test")]),
    )
    .with_clock(clock)
    .with_base_url(server.uri())
}

fn context(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Validates `CloudLogger::log` behavior for the full entry scenario.
///
/// Assertions:
/// - Confirms the entry carries log name, severity, pinned timestamp and
///   the global resource.
/// - Confirms the payload is the context with `message` merged in.
/// - Confirms per-call labels merge over the base labels.
#[tokio::test]
async fn test_entry_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WRITE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    logger(&server)
        .log(
            Severity::Warning,
            "order rejected",
            context(&[("order_id", json!("o-1"))]),
            attributes(&[("env", "staging"), ("region", "eu")]),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let entry = &body["entries"][0];
    assert_eq!(entry["logName"], "projects/demo-project/logs/app");
    assert_eq!(entry["resource"], json!({"type": "global"}));
    assert_eq!(entry["severity"], "WARNING");
    assert_eq!(entry["timestamp"], "2030-01-01T00:00:00Z");
    assert_eq!(entry["jsonPayload"], json!({"order_id": "o-1", "message": "order rejected"}));
    assert_eq!(entry["labels"], json!({"env": "staging", "region": "eu"}));
}

/// Validates `CloudLogger::with` behavior for the sibling logger scenario.
///
/// Assertions:
/// - Confirms the sibling writes under its own log name and labels.
#[tokio::test]
async fn test_sibling_logger() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WRITE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    logger(&server)
        .with("audit", attributes(&[("channel", "audit")]))
        .info("user signed in", Map::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let entry = &body["entries"][0];
    assert_eq!(entry["logName"], "projects/demo-project/logs/audit");
    assert_eq!(entry["severity"], "INFO");
    assert_eq!(entry["labels"], json!({"channel": "audit"}));
}
