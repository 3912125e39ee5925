//! Cloud Tasks client
//!
//! Creates tasks on a fixed queue. Each task wraps an arbitrary HTTP request
//! to be dispatched by the service, optionally deferred to a normalized
//! schedule time.

use std::collections::HashMap;
use std::sync::Arc;

use foxcloud_common::{Clock, ServiceAccount, SystemClock};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::errors::TaskError;
use super::schedule::ScheduleTime;
use crate::http::{decode_response, ApiError, HttpClient};

/// OAuth scope required for task creation.
pub const ACCESS_SCOPE: &str = "https://www.googleapis.com/auth/cloud-tasks";

/// Production endpoint; overridable for tests.
pub const DEFAULT_BASE_URL: &str = "https://cloudtasks.googleapis.com";

/// How much of the created task the response should carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseView {
    #[default]
    Basic,
    Full,
}

/// Description of the HTTP request a task should dispatch.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Target URL the service will call when the task fires.
    pub url: String,
    method: Option<String>,
    headers: Option<HashMap<String, String>>,
    body: Option<String>,
    response_view: Option<ResponseView>,
    schedule_time: Option<ScheduleTime>,
}

impl TaskRequest {
    /// A task targeting `url`, dispatched immediately as a POST.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: None,
            headers: None,
            body: None,
            response_view: None,
            schedule_time: None,
        }
    }

    /// Override the dispatch method (POST by default).
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Headers sent with the dispatched request.
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Raw body of the dispatched request.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Request the full task representation in the response.
    #[must_use]
    pub fn with_response_view(mut self, view: ResponseView) -> Self {
        self.response_view = Some(view);
        self
    }

    /// Defer dispatch to the given schedule time.
    #[must_use]
    pub fn with_schedule_time(mut self, schedule_time: impl Into<ScheduleTime>) -> Self {
        self.schedule_time = Some(schedule_time.into());
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskBody {
    task: TaskDescriptor,
    // Always on the wire; the service treats absence as BASIC but the
    // request shape carries it explicitly.
    response_view: ResponseView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskDescriptor {
    http_request: HttpRequestSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule_time: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpRequestSpec {
    http_method: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

/// Client bound to one queue in one location.
#[derive(Debug, Clone)]
pub struct TaskClient {
    account: Arc<ServiceAccount>,
    http: HttpClient,
    location: String,
    queue: String,
    clock: Arc<dyn Clock>,
    base_url: String,
}

impl TaskClient {
    /// Bind a client to a queue. The account is narrowed to [`ACCESS_SCOPE`].
    pub fn new(
        account: &Arc<ServiceAccount>,
        http: HttpClient,
        location: impl Into<String>,
        queue: impl Into<String>,
    ) -> Self {
        Self {
            account: account.with_scopes(&[ACCESS_SCOPE]),
            http,
            location: location.into(),
            queue: queue.into(),
            clock: Arc::new(SystemClock),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Inject a clock for schedule-time resolution.
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

    /// Create a task on the bound queue.
    ///
    /// The schedule time, when present, is normalized against the injected
    /// clock before the call. Exactly one request is sent.
    ///
    /// # Errors
    /// - [`TaskError::InvalidScheduleTime`] before any network traffic
    /// - [`TaskError::Api`] for config, transport, remote or decode failures
    pub async fn create_task(&self, request: TaskRequest) -> Result<Value, TaskError> {
        let schedule_time = match &request.schedule_time {
            Some(time) => Some(time.normalize(self.clock.now())?),
            None => None,
        };

        let body = CreateTaskBody {
            task: TaskDescriptor {
                http_request: HttpRequestSpec {
                    http_method: request.method.unwrap_or_else(|| "POST".to_string()),
                    url: request.url,
                    headers: request.headers,
                    body: request.body,
                },
                schedule_time,
            },
            response_view: request.response_view.unwrap_or_default(),
        };

        let url = self.create_url()?;
        debug!(queue = %self.queue, location = %self.location, "creating task");
        let token = self.account.token().map_err(ApiError::from)?;
        let response = self
            .http
            .send(self.http.request(Method::POST, &url).bearer_auth(token).json(&body))
            .await?;
        Ok(decode_response(response).await?)
    }

    fn create_url(&self) -> Result<String, ApiError> {
        let project = self
            .account
            .project_id()
            .ok_or_else(|| ApiError::Config("service account has no project id".to_string()))?;
        Ok(format!(
            "{}/v2/projects/{}/locations/{}/queues/{}/tasks",
            self.base_url, project, self.location, self.queue
        ))
    }
}
