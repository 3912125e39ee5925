//! Client wiring
//!
//! One factory per service account: every client it builds shares the same
//! credentials, HTTP transport and clock.

use std::collections::HashMap;
use std::sync::Arc;

use foxcloud_common::{Clock, ServiceAccount, SystemClock};

use crate::http::{ApiError, HttpClient};
use crate::logging::CloudLogger;
use crate::pubsub::{PublisherClient, SubscriberClient};
use crate::tasks::TaskClient;

/// Builds clients bound to one service account.
#[derive(Debug, Clone)]
pub struct CloudFactory {
    account: Arc<ServiceAccount>,
    http: HttpClient,
    clock: Arc<dyn Clock>,
}

impl CloudFactory {
    /// A factory around the given account with a default HTTP client.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] when the HTTP client cannot be built.
    pub fn new(account: Arc<ServiceAccount>) -> Result<Self, ApiError> {
        Ok(Self { account, http: HttpClient::new()?, clock: Arc::new(SystemClock) })
    }

    /// Inject a clock shared by every built client.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// A publisher for `topic`, immediate publishing only.
    #[must_use]
    pub fn publisher(&self, topic: impl Into<String>) -> PublisherClient {
        PublisherClient::new(&self.account, self.http.clone(), topic)
    }

    /// A publisher for `topic` with deferred dispatch through the given
    /// queue.
    #[must_use]
    pub fn publisher_with_queue(
        &self,
        topic: impl Into<String>,
        location: impl Into<String>,
        queue: impl Into<String>,
    ) -> PublisherClient {
        self.publisher(topic).with_task_client(self.task_client(location, queue))
    }

    /// A subscriber for `subscription`.
    #[must_use]
    pub fn subscriber(&self, subscription: impl Into<String>) -> SubscriberClient {
        SubscriberClient::new(&self.account, self.http.clone(), subscription)
    }

    /// A task client bound to the given queue.
    #[must_use]
    pub fn task_client(
        &self,
        location: impl Into<String>,
        queue: impl Into<String>,
    ) -> TaskClient {
        TaskClient::new(&self.account, self.http.clone(), location, queue)
            .with_clock(Arc::clone(&self.clock))
    }

    /// A logger writing to `log_name` with the given base labels.
    #[must_use]
    pub fn logger(
        &self,
        log_name: impl Into<String>,
        labels: HashMap<String, String>,
    ) -> CloudLogger {
        CloudLogger::new(&self.account, self.http.clone(), log_name, labels)
            .with_clock(Arc::clone(&self.clock))
    }
}
