//! Schedule-time normalization
//!
//! Four input shapes collapse into one wire format
//! (`YYYY-MM-DDTHH:MM:SSZ`, whole seconds, UTC): epoch seconds, relative
//! offset seconds, an ISO-8601 string, or an absolute instant.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::errors::TaskError;

/// Numeric disambiguation boundary: values above this are absolute epoch
/// timestamps, values at or below are offsets in seconds from now.
///
/// The boundary is the epoch value of 1989-01-01T00:00:00Z, inherited from
/// the system this client replaces. It is deliberately kept as-is; callers
/// wanting unambiguous behavior should pass [`ScheduleTime::Instant`].
pub const ABSOLUTE_EPOCH_THRESHOLD: i64 = 599_616_000;

/// Wire format for every timestamp this library emits.
const WIRE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A future instant in one of the accepted shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScheduleTime {
    /// Epoch seconds when above [`ABSOLUTE_EPOCH_THRESHOLD`], otherwise an
    /// offset in seconds from now.
    Seconds(i64),
    /// ISO-8601 timestamp string.
    Timestamp(String),
    /// Already-absolute instant.
    Instant(DateTime<Utc>),
}

impl ScheduleTime {
    /// Normalize into the canonical wire format, resolving offsets against
    /// `now`.
    ///
    /// # Errors
    /// Returns [`TaskError::InvalidScheduleTime`] when a timestamp string
    /// cannot be parsed or an epoch value is out of range.
    pub fn normalize(&self, now: DateTime<Utc>) -> Result<String, TaskError> {
        let instant = match self {
            Self::Seconds(n) if *n > ABSOLUTE_EPOCH_THRESHOLD => Utc
                .timestamp_opt(*n, 0)
                .single()
                .ok_or_else(|| TaskError::InvalidScheduleTime(n.to_string()))?,
            Self::Seconds(n) => now + Duration::seconds(*n),
            Self::Timestamp(s) => parse_timestamp(s)?,
            Self::Instant(at) => *at,
        };
        Ok(instant.format(WIRE_TIME_FORMAT).to_string())
    }
}

impl From<i64> for ScheduleTime {
    fn from(seconds: i64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<&str> for ScheduleTime {
    fn from(timestamp: &str) -> Self {
        Self::Timestamp(timestamp.to_string())
    }
}

impl From<String> for ScheduleTime {
    fn from(timestamp: String) -> Self {
        Self::Timestamp(timestamp)
    }
}

impl From<DateTime<Utc>> for ScheduleTime {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Instant(at)
    }
}

fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TaskError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(TaskError::InvalidScheduleTime(input.to_string()))
}
