//! Booth log and analytics store trait.

use crate::error::Result;
use crate::model::{AnalyticsEvent, BoothId, BoothLog};
use async_trait::async_trait;

/// Append-only booth telemetry.
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    /// Append a log entry.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn append_log(&self, entry: &BoothLog) -> Result<()>;

    /// Most recent log entries of a booth, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn recent_logs(&self, booth_id: BoothId, limit: usize) -> Result<Vec<BoothLog>>;

    /// Append an analytics event.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn append_event(&self, event: &AnalyticsEvent) -> Result<()>;

    /// Most recent analytics events of a booth, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn recent_events(&self, booth_id: BoothId, limit: usize) -> Result<Vec<AnalyticsEvent>>;

    /// Delete every log entry and event of a booth.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn purge_booth(&self, booth_id: BoothId) -> Result<()>;
}
