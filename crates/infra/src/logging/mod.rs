//! Cloud Logging entry writer
//!
//! - [`Severity`] — level names plus syslog and monolog numeric aliases
//! - [`CloudLogger`] — log-name-bound entry writer with base labels

mod client;
mod severity;

pub use client::{CloudLogger, ACCESS_SCOPE, DEFAULT_BASE_URL};
pub use severity::Severity;
