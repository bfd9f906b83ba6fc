//! Booth store trait.

use crate::error::Result;
use crate::model::{Booth, BoothId, BranchId};
use async_trait::async_trait;

/// Booth persistence, including the token-version counter.
///
/// # Implementation Notes
///
/// - `update` must leave `token_version` untouched.
/// - `initialize_token_version` and `bump_token_version` MUST be atomic
///   with respect to concurrent callers (single `UPDATE ... RETURNING` in
///   PostgreSQL, mutex-protected read-modify-write in memory).
#[async_trait]
pub trait BoothRepository: Send + Sync {
    /// Insert a new booth.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, booth: &Booth) -> Result<()>;

    /// Overwrite branch, name, type, status and config of an existing booth.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booth does not exist.
    async fn update(&self, booth: &Booth) -> Result<()>;

    /// Delete a booth.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booth does not exist.
    async fn delete(&self, id: BoothId) -> Result<()>;

    /// Fetch a booth.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booth does not exist.
    async fn get(&self, id: BoothId) -> Result<Booth>;

    /// List booths, optionally restricted to one branch.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self, branch_id: Option<BranchId>) -> Result<Vec<Booth>>;

    /// Move `token_version` from `0` to `1` if (and only if) it is still `0`.
    ///
    /// Returns the booth as stored after the call, whether or not this call
    /// performed the write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booth does not exist.
    async fn initialize_token_version(&self, id: BoothId) -> Result<Booth>;

    /// Atomically advance `token_version` using
    /// [`Booth::next_token_version`] and return the updated booth.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booth does not exist.
    async fn bump_token_version(&self, id: BoothId) -> Result<Booth>;
}
