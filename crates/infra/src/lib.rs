//! # foxcloud Infrastructure
//!
//! Integration tier for the foxcloud workspace.
//!
//! This crate contains:
//! - The HTTP client wrapper and shared response decoding (`http`)
//! - Pub/Sub publish, pull and acknowledge clients (`pubsub`)
//! - Cloud Tasks deferred dispatch (`tasks`)
//! - Cloud Logging entry writer (`logging`)
//! - The wiring factory (`factory`)
//!
//! ## Architecture
//! - Every client narrows an injected `ServiceAccount` to the scope it needs
//! - One outbound call per public operation; retries are the caller's concern
//! - All "impure" code (network I/O) lives here; credential logic lives in
//!   `foxcloud-common`

pub mod factory;
pub mod http;
pub mod logging;
pub mod pubsub;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use factory::CloudFactory;
pub use http::{ApiError, HttpClient};
pub use logging::CloudLogger;
pub use pubsub::{PublisherClient, PubsubMessage, SubscriberClient};
pub use tasks::{ScheduleTime, TaskClient, TaskRequest};
