//! In-memory payment store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{Payment, PaymentId, SessionId};
use crate::providers::PaymentRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`PaymentRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentRepository {
    payments: Arc<Mutex<HashMap<PaymentId, Payment>>>,
}

impl InMemoryPaymentRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<()> {
        let mut payments = lock(&self.payments, "payment")?;
        if payments.values().any(|p| p.session_id == payment.session_id) {
            return Err(CoreError::Conflict(format!(
                "session {} already has a payment",
                payment.session_id
            )));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<()> {
        let mut payments = lock(&self.payments, "payment")?;
        let stored = payments
            .get_mut(&payment.id)
            .ok_or_else(|| CoreError::not_found("payment", payment.id))?;
        stored.method = payment.method;
        stored.amount = payment.amount;
        stored.currency.clone_from(&payment.currency);
        stored.status = payment.status;
        stored.transaction_ref.clone_from(&payment.transaction_ref);
        Ok(())
    }

    async fn get(&self, id: PaymentId) -> Result<Payment> {
        lock(&self.payments, "payment")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("payment", id))
    }

    async fn find_by_session(&self, session_id: SessionId) -> Result<Option<Payment>> {
        Ok(lock(&self.payments, "payment")?
            .values()
            .find(|p| p.session_id == session_id)
            .cloned())
    }
}
