//! Integration tests for the task client against a mock endpoint.

#[path = "support.rs"]
mod support;

use foxcloud_infra::http::HttpClient;
use foxcloud_infra::tasks::{ResponseView, TaskClient, TaskError, TaskRequest};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{attributes, fixed_clock, test_account};

const TASKS_PATH: &str = "/v2/projects/demo-project/locations/europe-west1/queues/deferred/tasks";

fn task_client(server: &MockServer) -> TaskClient {
    let clock = fixed_clock();
    let account = test_account(clock.clone());
    TaskClient::new(&account, HttpClient::new().unwrap(), "europe-west1", "deferred")
        .with_clock(clock)
        .with_base_url(server.uri())
}

/// Validates `TaskClient::create_task` behavior for the fully-populated
/// scenario.
///
/// Assertions:
/// - Confirms the request targets the queue path.
/// - Confirms the normalized schedule time sits inside the task object.
/// - Confirms headers, body, method and response view reach the wire.
/// - Confirms the bearer token is attached.
#[tokio::test]
async fn test_create_task_wire_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "task-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let request = TaskRequest::new("https://example.com/hook")
        .with_method("GET")
        .with_headers(attributes(&[("Content-Type", "application/json")]))
        .with_body("payload")
        .with_response_view(ResponseView::Full)
        .with_schedule_time(600);

    let created = task_client(&server).create_task(request).await.unwrap();
    assert_eq!(created["name"], "task-1");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("Bearer "));

    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "task": {
                "httpRequest": {
                    "httpMethod": "GET",
                    "url": "https://example.com/hook",
                    "headers": {"Content-Type": "application/json"},
                    "body": "payload"
                },
                "scheduleTime": "2030-01-01T00:10:00Z"
            },
            "responseView": "FULL"
        })
    );
}

/// Validates `TaskClient::create_task` behavior for the minimal scenario.
///
/// Assertions:
/// - Confirms the method defaults to POST.
/// - Confirms `responseView` is sent as `BASIC` when the caller sets none.
/// - Ensures unset optional fields are omitted from the wire body.
#[tokio::test]
async fn test_create_task_minimal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "task-1"})))
        .mount(&server)
        .await;

    task_client(&server)
        .create_task(TaskRequest::new("https://example.com/hook"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["responseView"], "BASIC");
    assert_eq!(
        body,
        json!({
            "task": {
                "httpRequest": {
                    "httpMethod": "POST",
                    "url": "https://example.com/hook"
                }
            },
            "responseView": "BASIC"
        })
    );
}

/// Validates `TaskClient::create_task` behavior for the invalid schedule
/// time scenario.
///
/// Assertions:
/// - Ensures normalization fails before any network traffic.
#[tokio::test]
async fn test_invalid_schedule_time_fails_eagerly() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let request = TaskRequest::new("https://example.com/hook").with_schedule_time("not a time");
    let result = task_client(&server).create_task(request).await;
    assert!(matches!(result, Err(TaskError::InvalidScheduleTime(_))));
}

/// Validates `TaskClient::create_task` behavior for the remote error
/// scenario.
///
/// Assertions:
/// - Confirms a flat error body surfaces as a remote API error.
#[tokio::test]
async fn test_remote_error_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TASKS_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "NOT_FOUND", "message": "queue does not exist", "code": 404
        })))
        .mount(&server)
        .await;

    let result = task_client(&server).create_task(TaskRequest::new("https://example.com/hook")).await;
    match result {
        Err(TaskError::Api(foxcloud_infra::ApiError::Remote { status, message, code, .. })) => {
            assert_eq!(status, "NOT_FOUND");
            assert_eq!(message, "queue does not exist");
            assert_eq!(code, 404);
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}
