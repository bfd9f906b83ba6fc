//! In-memory voucher and redemption store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{NewRedemption, Redemption, SessionId, Voucher, VoucherId};
use crate::providers::VoucherRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Ledger {
    vouchers: HashMap<VoucherId, Voucher>,
    redemptions: Vec<Redemption>,
}

/// In-memory [`VoucherRepository`].
///
/// Vouchers and redemptions share one lock so `record_redemption` is a
/// single critical section.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVoucherRepository {
    inner: Arc<Mutex<Ledger>>,
}

impl InMemoryVoucherRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VoucherRepository for InMemoryVoucherRepository {
    async fn create(&self, voucher: &Voucher) -> Result<()> {
        let mut inner = lock(&self.inner, "voucher")?;
        if inner.vouchers.values().any(|v| v.code == voucher.code) {
            return Err(CoreError::Conflict(format!(
                "voucher code {} already exists",
                voucher.code
            )));
        }
        inner.vouchers.insert(voucher.id, voucher.clone());
        Ok(())
    }

    async fn update(&self, voucher: &Voucher) -> Result<()> {
        let mut inner = lock(&self.inner, "voucher")?;
        let stored = inner
            .vouchers
            .get_mut(&voucher.id)
            .ok_or_else(|| CoreError::not_found("voucher", voucher.id))?;
        stored.value = voucher.value;
        stored.unit = voucher.unit;
        stored.max_usage = voucher.max_usage;
        stored.valid_from = voucher.valid_from;
        stored.valid_to = voucher.valid_to;
        stored.active = voucher.active;
        Ok(())
    }

    async fn delete(&self, id: VoucherId) -> Result<()> {
        let mut inner = lock(&self.inner, "voucher")?;
        inner
            .vouchers
            .remove(&id)
            .ok_or_else(|| CoreError::not_found("voucher", id))?;
        inner.redemptions.retain(|r| r.voucher_id != id);
        Ok(())
    }

    async fn get(&self, id: VoucherId) -> Result<Voucher> {
        lock(&self.inner, "voucher")?
            .vouchers
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("voucher", id))
    }

    async fn get_by_code(&self, code: &str) -> Result<Voucher> {
        lock(&self.inner, "voucher")?
            .vouchers
            .values()
            .find(|v| v.code == code)
            .cloned()
            .ok_or_else(|| CoreError::not_found("voucher", code))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Voucher>> {
        let mut vouchers: Vec<Voucher> = lock(&self.inner, "voucher")?
            .vouchers
            .values()
            .filter(|v| !active_only || v.active)
            .cloned()
            .collect();
        vouchers.sort_by_key(|v| (v.created_at, v.id));
        Ok(vouchers)
    }

    async fn record_redemption(
        &self,
        voucher_id: VoucherId,
        redemption: NewRedemption,
        redeemed_at: DateTime<Utc>,
    ) -> Result<Option<(Redemption, Voucher)>> {
        let mut inner = lock(&self.inner, "voucher")?;

        let voucher = inner
            .vouchers
            .get_mut(&voucher_id)
            .ok_or_else(|| CoreError::not_found("voucher", voucher_id))?;
        if voucher.is_limited() && voucher.used_count >= voucher.max_usage {
            return Ok(None);
        }
        voucher.used_count += 1;
        let voucher = voucher.clone();

        let redemption = redemption.into_redemption(voucher_id, redeemed_at);
        inner.redemptions.push(redemption.clone());
        Ok(Some((redemption, voucher)))
    }

    async fn list_redemptions(&self, voucher_id: VoucherId) -> Result<Vec<Redemption>> {
        Ok(lock(&self.inner, "voucher")?
            .redemptions
            .iter()
            .filter(|r| r.voucher_id == voucher_id)
            .cloned()
            .collect())
    }

    async fn list_session_redemptions(&self, session_id: SessionId) -> Result<Vec<Redemption>> {
        Ok(lock(&self.inner, "voucher")?
            .redemptions
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect())
    }
}
