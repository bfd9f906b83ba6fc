//! `PostgreSQL` payment store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{Payment, PaymentId, SessionId};
use photobooth_core::providers::PaymentRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, session_id, method, amount, currency, status, transaction_ref, created_at";

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    session_id: Uuid,
    method: String,
    amount: f64,
    currency: String,
    status: String,
    transaction_ref: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = CoreError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        Ok(Self {
            id: PaymentId(row.id),
            session_id: SessionId(row.session_id),
            method: row.method.parse().map_err(|e| corrupt_row("payments.method", &e))?,
            amount: row.amount,
            currency: row.currency,
            status: row.status.parse().map_err(|e| corrupt_row("payments.status", &e))?,
            transaction_ref: row.transaction_ref,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL` payment repository.
///
/// The unique index on `payments.session_id` turns a second payment for
/// a session into a `Conflict`.
#[derive(Clone)]
pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    /// Create a new `PostgreSQL` payment repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<()> {
        let sql = format!("INSERT INTO payments ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)");
        sqlx::query(&sql)
            .bind(payment.id.0)
            .bind(payment.session_id.0)
            .bind(payment.method.as_str())
            .bind(payment.amount)
            .bind(&payment.currency)
            .bind(payment.status.as_str())
            .bind(&payment.transaction_ref)
            .bind(payment.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create payment", &e))?;
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE payments
            SET method = $2, amount = $3, currency = $4, status = $5, transaction_ref = $6
            WHERE id = $1
            ",
        )
        .bind(payment.id.0)
        .bind(payment.method.as_str())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(payment.status.as_str())
        .bind(&payment.transaction_ref)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update payment", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("payment", payment.id));
        }
        Ok(())
    }

    async fn get(&self, id: PaymentId) -> Result<Payment> {
        let sql = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get payment", &e))?
            .ok_or_else(|| CoreError::not_found("payment", id))?
            .try_into()
    }

    async fn find_by_session(&self, session_id: SessionId) -> Result<Option<Payment>> {
        let sql = format!("SELECT {COLUMNS} FROM payments WHERE session_id = $1");
        sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(session_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("find session payment", &e))?
            .map(Payment::try_from)
            .transpose()
    }
}
