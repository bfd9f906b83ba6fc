//! Payment store trait.

use crate::error::Result;
use crate::model::{Payment, PaymentId, SessionId};
use async_trait::async_trait;

/// Payment persistence. A session has at most one payment.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the session already has a payment.
    async fn create(&self, payment: &Payment) -> Result<()>;

    /// Overwrite method, amount, currency, status and transaction reference.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment does not exist.
    async fn update(&self, payment: &Payment) -> Result<()>;

    /// Fetch a payment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the payment does not exist.
    async fn get(&self, id: PaymentId) -> Result<Payment>;

    /// Fetch the payment of a session.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn find_by_session(&self, session_id: SessionId) -> Result<Option<Payment>>;
}
