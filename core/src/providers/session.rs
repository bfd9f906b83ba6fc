//! Session store trait.

use crate::error::Result;
use crate::model::{BoothId, Session, SessionId, SessionStatus};
use async_trait::async_trait;

/// Session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session.
    ///
    /// # Errors
    ///
    /// Returns error if the write fails.
    async fn create(&self, session: &Session) -> Result<()>;

    /// Overwrite every mutable field of an existing session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn update(&self, session: &Session) -> Result<()>;

    /// Delete a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn delete(&self, id: SessionId) -> Result<()>;

    /// Fetch a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    async fn get(&self, id: SessionId) -> Result<Session>;

    /// List sessions of one booth, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns error if the read fails.
    async fn list(&self, booth_id: BoothId, status: Option<SessionStatus>) -> Result<Vec<Session>>;
}
