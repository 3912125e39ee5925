//! Log severity mapping

use serde::{Deserialize, Serialize};

/// Entry severity, in ascending order of urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    Default,
    Debug,
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl Severity {
    /// Map a level designator to a severity.
    ///
    /// Accepts level names (case-insensitive, common aliases included),
    /// syslog numerics (`"7"` debug through `"0"` emergency) and
    /// hundreds-scale numerics (`"100"` debug through `"800"` emergency).
    /// Anything else maps to [`Severity::Default`].
    ///
    /// The hundreds-scale column is the table inherited from the system this
    /// client replaces: each hundred maps to the next severity name, so it
    /// diverges from canonical monolog levels above 200 (e.g. `"300"` is
    /// NOTICE here, not WARNING). Deliberately kept as-is.
    #[must_use]
    pub fn from_level(level: &str) -> Self {
        match level.to_ascii_lowercase().as_str() {
            "debug" | "7" | "100" => Self::Debug,
            "info" | "6" | "200" => Self::Info,
            "notice" | "5" | "300" => Self::Notice,
            "warning" | "warn" | "4" | "400" => Self::Warning,
            "error" | "err" | "3" | "500" => Self::Error,
            "critical" | "crit" | "2" | "600" => Self::Critical,
            "alert" | "1" | "700" => Self::Alert,
            "emergency" | "emerg" | "0" | "800" => Self::Emergency,
            _ => Self::Default,
        }
    }

    /// Wire name of the severity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }
}
