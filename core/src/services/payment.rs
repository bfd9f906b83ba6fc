//! Payment service.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{Payment, PaymentId, PaymentMethod, PaymentStatus, SessionId};
use crate::providers::{PaymentRepository, SessionRepository};
use crate::validation::{require_non_empty, validate_amount};
use serde::Deserialize;
use std::sync::Arc;

/// Currency used when a payment does not name one.
pub const DEFAULT_CURRENCY: &str = "THB";

/// Input for [`PaymentService::create`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    /// Session being paid for.
    pub session_id: SessionId,

    /// How the customer pays.
    pub method: PaymentMethod,

    /// Amount charged.
    #[serde(default)]
    pub amount: f64,

    /// ISO currency code, [`DEFAULT_CURRENCY`] when omitted.
    #[serde(default)]
    pub currency: Option<String>,

    /// Initial status, `pending` when omitted.
    #[serde(default)]
    pub status: Option<PaymentStatus>,

    /// Provider transaction reference.
    #[serde(default)]
    pub transaction_ref: Option<String>,
}

/// Input for [`PaymentService::update`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayment {
    /// New method.
    #[serde(default)]
    pub method: Option<PaymentMethod>,

    /// New amount.
    #[serde(default)]
    pub amount: Option<f64>,

    /// New currency.
    #[serde(default)]
    pub currency: Option<String>,

    /// New status.
    #[serde(default)]
    pub status: Option<PaymentStatus>,

    /// Provider transaction reference.
    #[serde(default)]
    pub transaction_ref: Option<String>,
}

/// Session payments. Each session has at most one.
#[derive(Clone)]
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    sessions: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    /// Create the service.
    #[must_use]
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            sessions,
            clock,
        }
    }

    /// Record the payment of a session and link it from the session.
    ///
    /// # Errors
    ///
    /// - `Validation` for a negative amount or blank currency
    /// - `NotFound` if the session does not exist
    /// - `Conflict` if the session already has a payment
    pub async fn create(&self, input: CreatePayment) -> Result<Payment> {
        validate_amount("amount", input.amount)?;
        let currency = input
            .currency
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        require_non_empty("currency", &currency)?;

        let mut session = self.sessions.get(input.session_id).await?;

        let payment = Payment {
            id: PaymentId::new(),
            session_id: input.session_id,
            method: input.method,
            amount: input.amount,
            currency,
            status: input.status.unwrap_or_default(),
            transaction_ref: input.transaction_ref,
            created_at: self.clock.now(),
        };
        self.payments.create(&payment).await?;

        session.payment_id = Some(payment.id);
        self.sessions.update(&session).await?;

        tracing::info!(
            payment_id = %payment.id,
            session_id = %payment.session_id,
            method = %payment.method,
            status = %payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Validation` for a negative
    /// amount or blank currency.
    pub async fn update(&self, id: PaymentId, input: UpdatePayment) -> Result<Payment> {
        if let Some(amount) = input.amount {
            validate_amount("amount", amount)?;
        }
        if let Some(currency) = &input.currency {
            require_non_empty("currency", currency)?;
        }

        let mut payment = self.payments.get(id).await?;
        if let Some(method) = input.method {
            payment.method = method;
        }
        if let Some(amount) = input.amount {
            payment.amount = amount;
        }
        if let Some(currency) = input.currency {
            payment.currency = currency;
        }
        if let Some(status) = input.status {
            if status != payment.status {
                tracing::info!(payment_id = %id, from = %payment.status, to = %status, "Payment status changed");
            }
            payment.status = status;
        }
        if input.transaction_ref.is_some() {
            payment.transaction_ref = input.transaction_ref;
        }

        self.payments.update(&payment).await?;
        Ok(payment)
    }

    /// Fetch a payment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: PaymentId) -> Result<Payment> {
        self.payments.get(id).await
    }

    /// Fetch the payment of a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session has no payment.
    pub async fn get_by_session(&self, session_id: SessionId) -> Result<Payment> {
        self.payments
            .find_by_session(session_id)
            .await?
            .ok_or_else(|| CoreError::not_found("payment", session_id))
    }
}
