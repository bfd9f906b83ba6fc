//! Session service.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{
    BoothId, JsonObject, PaymentId, Session, SessionId, SessionStatus, UserId, VoucherId,
};
use crate::providers::{PaymentRepository, PhotoRepository, SessionRepository, VoucherRepository};
use crate::validation::validate_amount;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`SessionService::create`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSession {
    /// Booth the caller claims to be; when present it must equal the
    /// authenticated booth. The service always uses the authenticated one.
    #[serde(default)]
    pub booth_id: Option<BoothId>,

    /// Registered customer.
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Voucher applied.
    #[serde(default)]
    pub voucher_id: Option<VoucherId>,

    /// Payment record.
    #[serde(default)]
    pub payment_id: Option<PaymentId>,

    /// Initial status, `started` when omitted.
    #[serde(default)]
    pub status: Option<SessionStatus>,

    /// Price charged.
    #[serde(default)]
    pub total_price: Option<f64>,

    /// Booth configuration snapshot.
    #[serde(default)]
    pub booth_snapshot: JsonObject,

    /// Phone number for photo delivery.
    #[serde(default)]
    pub phone_temp: Option<String>,
}

/// Input for [`SessionService::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSession {
    /// Registered customer.
    #[serde(default)]
    pub user_id: Option<UserId>,

    /// Voucher applied.
    #[serde(default)]
    pub voucher_id: Option<VoucherId>,

    /// Payment record.
    #[serde(default)]
    pub payment_id: Option<PaymentId>,

    /// New status.
    #[serde(default)]
    pub status: Option<SessionStatus>,

    /// Price charged.
    #[serde(default)]
    pub total_price: Option<f64>,

    /// Finish time (Unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Booth configuration snapshot.
    #[serde(default)]
    pub booth_snapshot: Option<JsonObject>,

    /// Phone number for photo delivery.
    #[serde(default)]
    pub phone_temp: Option<String>,
}

/// Session CRUD.
#[derive(Clone)]
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    photos: Arc<dyn PhotoRepository>,
    payments: Arc<dyn PaymentRepository>,
    vouchers: Arc<dyn VoucherRepository>,
    clock: Arc<dyn Clock>,
}

impl SessionService {
    /// Create the service.
    ///
    /// Photos, payments and vouchers are consulted only to refuse deleting a
    /// session that other records still point at.
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        photos: Arc<dyn PhotoRepository>,
        payments: Arc<dyn PaymentRepository>,
        vouchers: Arc<dyn VoucherRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            photos,
            payments,
            vouchers,
            clock,
        }
    }

    /// Start a session on `booth_id`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative price, or a store error.
    pub async fn create(&self, booth_id: BoothId, input: CreateSession) -> Result<Session> {
        if let Some(price) = input.total_price {
            validate_amount("total_price", price)?;
        }

        let session = Session {
            id: SessionId::new(),
            booth_id,
            user_id: input.user_id,
            voucher_id: input.voucher_id,
            payment_id: input.payment_id,
            started_at: Some(self.clock.now()),
            finished_at: None,
            status: input.status.unwrap_or_default(),
            total_price: input.total_price,
            booth_snapshot: input.booth_snapshot,
            phone_temp: input.phone_temp,
        };
        self.sessions.create(&session).await?;

        tracing::info!(session_id = %session.id, booth_id = %booth_id, "Session started");
        Ok(session)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Validation` for a negative
    /// price.
    pub async fn update(&self, id: SessionId, input: UpdateSession) -> Result<Session> {
        if let Some(price) = input.total_price {
            validate_amount("total_price", price)?;
        }

        let mut session = self.sessions.get(id).await?;
        if input.user_id.is_some() {
            session.user_id = input.user_id;
        }
        if input.voucher_id.is_some() {
            session.voucher_id = input.voucher_id;
        }
        if input.payment_id.is_some() {
            session.payment_id = input.payment_id;
        }
        if let Some(status) = input.status {
            session.status = status;
        }
        if input.total_price.is_some() {
            session.total_price = input.total_price;
        }
        if input.finished_at.is_some() {
            session.finished_at = input.finished_at;
        }
        if let Some(snapshot) = input.booth_snapshot {
            session.booth_snapshot = snapshot;
        }
        if input.phone_temp.is_some() {
            session.phone_temp = input.phone_temp;
        }

        self.sessions.update(&session).await?;
        Ok(session)
    }

    /// Delete a session without photos, payment or voucher redemptions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Conflict` while any of those
    /// records remain.
    pub async fn delete(&self, id: SessionId) -> Result<()> {
        self.sessions.get(id).await?;

        let blocker = if !self.photos.list_by_session(id).await?.is_empty() {
            Some("photos")
        } else if self.payments.find_by_session(id).await?.is_some() {
            Some("a payment")
        } else if !self.vouchers.list_session_redemptions(id).await?.is_empty() {
            Some("voucher redemptions")
        } else {
            None
        };
        if let Some(blocker) = blocker {
            return Err(CoreError::Conflict(format!("session {id} still has {blocker}")));
        }

        self.sessions.delete(id).await?;
        tracing::info!(session_id = %id, "Session deleted");
        Ok(())
    }

    /// Fetch a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: SessionId) -> Result<Session> {
        self.sessions.get(id).await
    }

    /// List sessions of a booth, optionally by status.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self, booth_id: BoothId, status: Option<SessionStatus>) -> Result<Vec<Session>> {
        self.sessions.list(booth_id, status).await
    }
}
