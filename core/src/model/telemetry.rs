//! Booth operational logs and analytics events.

use super::{text_enum, AnalyticsEventId, BoothId, BoothLogId, JsonObject, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a booth log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Routine event.
    #[default]
    Info,

    /// Degraded but working.
    Warn,

    /// Failure needing attention.
    Error,
}

text_enum!(LogLevel, "log level" {
    Info => "info",
    Warn => "warn",
    Error => "error",
});

impl LogLevel {
    /// Parse a level, falling back to [`LogLevel::Info`] for anything
    /// unrecognized. Booth firmware sends free-form levels.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().to_ascii_lowercase().parse().unwrap_or_default()
    }
}

/// Operational log line reported by a booth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothLog {
    /// Entry ID.
    pub id: BoothLogId,

    /// Reporting booth.
    pub booth_id: BoothId,

    /// Machine-readable event kind (`printer_jam`, `camera_reconnect`).
    pub event_type: String,

    /// Severity.
    pub level: LogLevel,

    /// Human-readable detail.
    pub message: Option<String>,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

/// Product analytics event reported by a booth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Event ID.
    pub id: AnalyticsEventId,

    /// Reporting booth.
    pub booth_id: BoothId,

    /// Session the event belongs to, if any.
    pub session_id: Option<SessionId>,

    /// Event name (`frame_selected`, `print_requested`).
    pub event_name: String,

    /// Event properties.
    #[serde(default)]
    pub payload: JsonObject,

    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_level_parsing() {
        assert_eq!(LogLevel::parse_lenient("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::parse_lenient(" error "), LogLevel::Error);
        assert_eq!(LogLevel::parse_lenient("debug"), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(""), LogLevel::Info);
    }
}
