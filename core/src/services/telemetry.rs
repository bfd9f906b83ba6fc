//! Booth operational logs and analytics events.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{
    AnalyticsEvent, AnalyticsEventId, BoothId, BoothLog, BoothLogId, JsonObject, LogLevel,
    SessionId,
};
use crate::providers::{BoothRepository, SessionRepository, TelemetryRepository};
use crate::validation::require_non_empty;
use serde::Deserialize;
use std::sync::Arc;

/// Log entries returned when no limit is given.
pub const DEFAULT_LOG_LIMIT: usize = 50;

/// Analytics events returned when no limit is given.
pub const DEFAULT_EVENT_LIMIT: usize = 100;

/// Upper bound on any listing.
pub const MAX_LIMIT: usize = 1000;

/// Input for [`TelemetryService::record_log`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordLog {
    /// Event kind.
    #[serde(default)]
    pub event_type: String,

    /// Free-form level; unknown values are recorded as `info`.
    #[serde(default)]
    pub level: Option<String>,

    /// Detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// Input for [`TelemetryService::record_event`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordEvent {
    /// Session the event belongs to; must be a session of the same booth.
    #[serde(default)]
    pub session_id: Option<SessionId>,

    /// Event name.
    #[serde(default)]
    pub event_name: String,

    /// Event properties.
    #[serde(default)]
    pub payload: JsonObject,
}

fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    match limit {
        Some(0) | None => default,
        Some(limit) => limit.min(MAX_LIMIT),
    }
}

/// Append-only telemetry per booth.
#[derive(Clone)]
pub struct TelemetryService {
    telemetry: Arc<dyn TelemetryRepository>,
    booths: Arc<dyn BoothRepository>,
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl TelemetryService {
    /// Create the service.
    #[must_use]
    pub fn new(
        telemetry: Arc<dyn TelemetryRepository>,
        booths: Arc<dyn BoothRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            telemetry,
            booths,
            sessions,
            clock,
        }
    }

    /// Append a log entry for a booth.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty event type, `NotFound` for an
    /// unknown booth.
    pub async fn record_log(&self, booth_id: BoothId, input: RecordLog) -> Result<BoothLog> {
        require_non_empty("event_type", &input.event_type)?;
        self.booths.get(booth_id).await?;

        let entry = BoothLog {
            id: BoothLogId::new(),
            booth_id,
            event_type: input.event_type,
            level: input
                .level
                .as_deref()
                .map_or_else(LogLevel::default, LogLevel::parse_lenient),
            message: input.message,
            created_at: self.clock.now(),
        };
        self.telemetry.append_log(&entry).await?;

        if entry.level == LogLevel::Error {
            tracing::warn!(booth_id = %booth_id, event_type = %entry.event_type, "Booth reported an error");
        }
        Ok(entry)
    }

    /// Most recent log entries of a booth, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown booth.
    pub async fn recent_logs(&self, booth_id: BoothId, limit: Option<usize>) -> Result<Vec<BoothLog>> {
        self.booths.get(booth_id).await?;
        self.telemetry
            .recent_logs(booth_id, clamp_limit(limit, DEFAULT_LOG_LIMIT))
            .await
    }

    /// Append an analytics event for a booth.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty event name
    /// - `NotFound` for an unknown booth or session
    /// - `Validation` if the session was run by another booth
    pub async fn record_event(&self, booth_id: BoothId, input: RecordEvent) -> Result<AnalyticsEvent> {
        require_non_empty("event_name", &input.event_name)?;
        self.booths.get(booth_id).await?;
        if let Some(session_id) = input.session_id {
            let session = self.sessions.get(session_id).await?;
            if !session.belongs_to(booth_id) {
                return Err(CoreError::Validation(format!(
                    "session {session_id} was not run by booth {booth_id}"
                )));
            }
        }

        let event = AnalyticsEvent {
            id: AnalyticsEventId::new(),
            booth_id,
            session_id: input.session_id,
            event_name: input.event_name,
            payload: input.payload,
            created_at: self.clock.now(),
        };
        self.telemetry.append_event(&event).await?;
        Ok(event)
    }

    /// Most recent analytics events of a booth, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown booth.
    pub async fn recent_events(
        &self,
        booth_id: BoothId,
        limit: Option<usize>,
    ) -> Result<Vec<AnalyticsEvent>> {
        self.booths.get(booth_id).await?;
        self.telemetry
            .recent_events(booth_id, clamp_limit(limit, DEFAULT_EVENT_LIMIT))
            .await
    }
}
