//! Voucher store trait.

use crate::error::Result;
use crate::model::{NewRedemption, Redemption, SessionId, Voucher, VoucherId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Voucher and redemption persistence.
///
/// # Security Requirements
///
/// `record_redemption` is the only path that changes `used_count`. It MUST
/// perform the conditional increment and the redemption insert as one
/// atomic unit:
///
/// - `PostgreSQL`: `UPDATE vouchers SET used_count = used_count + 1 WHERE id
///   = $1 AND (max_usage <= 0 OR used_count < max_usage) RETURNING ...`
///   followed by the `INSERT`, inside one transaction
/// - In-memory: both steps under the same mutex guard
///
/// A read-then-write in application code lets two concurrent redemptions
/// observe the same stale `used_count` and overshoot `max_usage`.
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    /// Insert a new voucher.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the code is already taken.
    async fn create(&self, voucher: &Voucher) -> Result<()>;

    /// Overwrite the editable fields (`value`, `unit`, `max_usage`,
    /// `valid_from`, `valid_to`, `active`). Never writes `used_count`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the voucher does not exist.
    async fn update(&self, voucher: &Voucher) -> Result<()>;

    /// Delete a voucher.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the voucher does not exist.
    async fn delete(&self, id: VoucherId) -> Result<()>;

    /// Fetch a voucher by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the voucher does not exist.
    async fn get(&self, id: VoucherId) -> Result<Voucher>;

    /// Fetch a voucher by its code.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no voucher has this code.
    async fn get_by_code(&self, code: &str) -> Result<Voucher>;

    /// List vouchers, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self, active_only: bool) -> Result<Vec<Voucher>>;

    /// Atomically consume one use of the voucher and record the redemption.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((redemption, voucher)))`: the increment applied; `voucher`
    ///   carries the new `used_count`
    /// - `Ok(None)`: the voucher is exhausted; nothing was written
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the voucher vanished, or a database error. No
    /// partial write survives an error.
    async fn record_redemption(
        &self,
        voucher_id: VoucherId,
        redemption: NewRedemption,
        redeemed_at: DateTime<Utc>,
    ) -> Result<Option<(Redemption, Voucher)>>;

    /// List redemptions of one voucher, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list_redemptions(&self, voucher_id: VoucherId) -> Result<Vec<Redemption>>;

    /// List redemptions made in one session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list_session_redemptions(&self, session_id: SessionId) -> Result<Vec<Redemption>>;
}
