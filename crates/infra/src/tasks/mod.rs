//! Cloud Tasks deferred dispatch
//!
//! Wraps an arbitrary HTTP request into a task created on a queue, optionally
//! deferred to a schedule time:
//! - [`ScheduleTime`] — the four accepted time shapes and their
//!   normalization into the wire format
//! - [`TaskRequest`] / [`TaskClient`] — task description and the
//!   queue-bound client

mod client;
mod errors;
mod schedule;

pub use client::{ResponseView, TaskClient, TaskRequest, ACCESS_SCOPE, DEFAULT_BASE_URL};
pub use errors::TaskError;
pub use schedule::{ScheduleTime, ABSOLUTE_EPOCH_THRESHOLD};
