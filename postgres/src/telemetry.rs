//! `PostgreSQL` booth log and analytics store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{
    AnalyticsEvent, AnalyticsEventId, BoothId, BoothLog, BoothLogId, JsonObject, SessionId,
};
use photobooth_core::providers::TelemetryRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

const LOG_COLUMNS: &str = "id, booth_id, event_type, level, message, created_at";

const EVENT_COLUMNS: &str = "id, booth_id, session_id, event_name, payload, created_at";

#[derive(sqlx::FromRow)]
struct BoothLogRow {
    id: Uuid,
    booth_id: Uuid,
    event_type: String,
    level: String,
    message: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BoothLogRow> for BoothLog {
    type Error = CoreError;

    fn try_from(row: BoothLogRow) -> Result<Self> {
        Ok(Self {
            id: BoothLogId(row.id),
            booth_id: BoothId(row.booth_id),
            event_type: row.event_type,
            level: row.level.parse().map_err(|e| corrupt_row("booth_logs.level", &e))?,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AnalyticsEventRow {
    id: Uuid,
    booth_id: Uuid,
    session_id: Option<Uuid>,
    event_name: String,
    payload: Json<JsonObject>,
    created_at: DateTime<Utc>,
}

impl From<AnalyticsEventRow> for AnalyticsEvent {
    fn from(row: AnalyticsEventRow) -> Self {
        Self {
            id: AnalyticsEventId(row.id),
            booth_id: BoothId(row.booth_id),
            session_id: row.session_id.map(SessionId),
            event_name: row.event_name,
            payload: row.payload.0,
            created_at: row.created_at,
        }
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// `PostgreSQL` telemetry repository.
#[derive(Clone)]
pub struct PostgresTelemetryRepository {
    pool: PgPool,
}

impl PostgresTelemetryRepository {
    /// Create a new `PostgreSQL` telemetry repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryRepository for PostgresTelemetryRepository {
    async fn append_log(&self, entry: &BoothLog) -> Result<()> {
        let sql = format!("INSERT INTO booth_logs ({LOG_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
        sqlx::query(&sql)
            .bind(entry.id.0)
            .bind(entry.booth_id.0)
            .bind(&entry.event_type)
            .bind(entry.level.as_str())
            .bind(&entry.message)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("append booth log", &e))?;
        Ok(())
    }

    async fn recent_logs(&self, booth_id: BoothId, limit: usize) -> Result<Vec<BoothLog>> {
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM booth_logs WHERE booth_id = $1 \
             ORDER BY created_at DESC, seq DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, BoothLogRow>(&sql)
            .bind(booth_id.0)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list booth logs", &e))?;

        rows.into_iter().map(BoothLog::try_from).collect()
    }

    async fn append_event(&self, event: &AnalyticsEvent) -> Result<()> {
        let sql = format!(
            "INSERT INTO analytics_events ({EVENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        );
        sqlx::query(&sql)
            .bind(event.id.0)
            .bind(event.booth_id.0)
            .bind(event.session_id.map(|id| id.0))
            .bind(&event.event_name)
            .bind(Json(&event.payload))
            .bind(event.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("append analytics event", &e))?;
        Ok(())
    }

    async fn recent_events(&self, booth_id: BoothId, limit: usize) -> Result<Vec<AnalyticsEvent>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM analytics_events WHERE booth_id = $1 \
             ORDER BY created_at DESC, seq DESC LIMIT $2"
        );
        let rows = sqlx::query_as::<_, AnalyticsEventRow>(&sql)
            .bind(booth_id.0)
            .bind(sql_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list analytics events", &e))?;

        Ok(rows.into_iter().map(AnalyticsEvent::from).collect())
    }

    async fn purge_booth(&self, booth_id: BoothId) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("begin telemetry purge", &e))?;
        sqlx::query("DELETE FROM booth_logs WHERE booth_id = $1")
            .bind(booth_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("purge booth logs", &e))?;
        sqlx::query("DELETE FROM analytics_events WHERE booth_id = $1")
            .bind(booth_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| database_error("purge analytics events", &e))?;
        tx.commit()
            .await
            .map_err(|e| database_error("commit telemetry purge", &e))?;
        Ok(())
    }
}
