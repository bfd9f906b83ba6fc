//! In-memory booth telemetry store.

use super::lock;
use crate::error::Result;
use crate::model::{AnalyticsEvent, BoothId, BoothLog};
use crate::providers::TelemetryRepository;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Journal {
    logs: Vec<BoothLog>,
    events: Vec<AnalyticsEvent>,
}

/// In-memory [`TelemetryRepository`]. Entries are kept in append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTelemetryRepository {
    inner: Arc<Mutex<Journal>>,
}

impl InMemoryTelemetryRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TelemetryRepository for InMemoryTelemetryRepository {
    async fn append_log(&self, entry: &BoothLog) -> Result<()> {
        lock(&self.inner, "telemetry")?.logs.push(entry.clone());
        Ok(())
    }

    async fn recent_logs(&self, booth_id: BoothId, limit: usize) -> Result<Vec<BoothLog>> {
        Ok(lock(&self.inner, "telemetry")?
            .logs
            .iter()
            .rev()
            .filter(|l| l.booth_id == booth_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn append_event(&self, event: &AnalyticsEvent) -> Result<()> {
        lock(&self.inner, "telemetry")?.events.push(event.clone());
        Ok(())
    }

    async fn recent_events(&self, booth_id: BoothId, limit: usize) -> Result<Vec<AnalyticsEvent>> {
        Ok(lock(&self.inner, "telemetry")?
            .events
            .iter()
            .rev()
            .filter(|e| e.booth_id == booth_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn purge_booth(&self, booth_id: BoothId) -> Result<()> {
        let mut inner = lock(&self.inner, "telemetry")?;
        inner.logs.retain(|l| l.booth_id != booth_id);
        inner.events.retain(|e| e.booth_id != booth_id);
        Ok(())
    }
}
