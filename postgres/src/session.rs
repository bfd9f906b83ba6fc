//! `PostgreSQL` session store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{
    BoothId, JsonObject, PaymentId, Session, SessionId, SessionStatus, UserId, VoucherId,
};
use photobooth_core::providers::SessionRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

const COLUMNS: &str = "id, booth_id, user_id, voucher_id, payment_id, started_at, finished_at, \
                       status, total_price, booth_snapshot, phone_temp";

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    booth_id: Uuid,
    user_id: Option<Uuid>,
    voucher_id: Option<Uuid>,
    payment_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    status: String,
    total_price: Option<f64>,
    booth_snapshot: Json<JsonObject>,
    phone_temp: Option<String>,
}

impl TryFrom<SessionRow> for Session {
    type Error = CoreError;

    fn try_from(row: SessionRow) -> Result<Self> {
        Ok(Self {
            id: SessionId(row.id),
            booth_id: BoothId(row.booth_id),
            user_id: row.user_id.map(UserId),
            voucher_id: row.voucher_id.map(VoucherId),
            payment_id: row.payment_id.map(PaymentId),
            started_at: row.started_at,
            finished_at: row.finished_at,
            status: row.status.parse().map_err(|e| corrupt_row("sessions.status", &e))?,
            total_price: row.total_price,
            booth_snapshot: row.booth_snapshot.0,
            phone_temp: row.phone_temp,
        })
    }
}

/// `PostgreSQL` session repository.
#[derive(Clone)]
pub struct PostgresSessionRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresSessionRepository {
    /// Create a new `PostgreSQL` session repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &Session) -> Result<()> {
        let sql = format!(
            "INSERT INTO sessions ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        );
        sqlx::query(&sql)
            .bind(session.id.0)
            .bind(session.booth_id.0)
            .bind(session.user_id.map(|id| id.0))
            .bind(session.voucher_id.map(|id| id.0))
            .bind(session.payment_id.map(|id| id.0))
            .bind(session.started_at)
            .bind(session.finished_at)
            .bind(session.status.as_str())
            .bind(session.total_price)
            .bind(Json(&session.booth_snapshot))
            .bind(&session.phone_temp)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create session", &e))?;
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE sessions
            SET user_id = $2, voucher_id = $3, payment_id = $4, started_at = $5,
                finished_at = $6, status = $7, total_price = $8, booth_snapshot = $9,
                phone_temp = $10
            WHERE id = $1
            ",
        )
        .bind(session.id.0)
        .bind(session.user_id.map(|id| id.0))
        .bind(session.voucher_id.map(|id| id.0))
        .bind(session.payment_id.map(|id| id.0))
        .bind(session.started_at)
        .bind(session.finished_at)
        .bind(session.status.as_str())
        .bind(session.total_price)
        .bind(Json(&session.booth_snapshot))
        .bind(&session.phone_temp)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update session", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("session", session.id));
        }
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete session", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("session", id));
        }
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Session> {
        let sql = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, SessionRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get session", &e))?
            .ok_or_else(|| CoreError::not_found("session", id))?
            .try_into()
    }

    async fn list(&self, booth_id: BoothId, status: Option<SessionStatus>) -> Result<Vec<Session>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM sessions WHERE booth_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY started_at, id"
        );
        let rows = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(booth_id.0)
            .bind(status.map(SessionStatus::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list sessions", &e))?;

        rows.into_iter().map(Session::try_from).collect()
    }
}
