//! User store trait.

use crate::error::Result;
use crate::model::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Account persistence.
///
/// # Implementation Notes
///
/// - `tel` and `email` are unique when set; duplicates are a `Conflict`.
/// - `update` never writes `points`; the balance moves only through
///   [`UserRepository::adjust_points`], which MUST be a single conditional
///   write (`UPDATE ... SET points = points + $2 WHERE id = $1 AND
///   points + $2 >= 0 RETURNING ...` in `PostgreSQL`).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the phone number or email is taken.
    async fn create(&self, user: &User) -> Result<()>;

    /// Overwrite tel, email, role and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist, `Conflict` if the
    /// new phone number or email is taken.
    async fn update(&self, user: &User) -> Result<()>;

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    async fn delete(&self, id: UserId) -> Result<()>;

    /// Fetch an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    async fn get(&self, id: UserId) -> Result<User>;

    /// Fetch an account by email.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account has this email.
    async fn get_by_email(&self, email: &str) -> Result<User>;

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self) -> Result<Vec<User>>;

    /// Atomically add `delta` to the point balance.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user))`: the balance changed
    /// - `Ok(None)`: the balance would go negative; nothing was written
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    async fn adjust_points(
        &self,
        id: UserId,
        delta: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>>;
}
