//! In-memory session store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{BoothId, Session, SessionId, SessionStatus};
use crate::providers::SessionRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`SessionRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: &Session) -> Result<()> {
        let mut sessions = lock(&self.sessions, "session")?;
        if sessions.contains_key(&session.id) {
            return Err(CoreError::Conflict(format!("session {} already exists", session.id)));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<()> {
        let mut sessions = lock(&self.sessions, "session")?;
        let stored = sessions
            .get_mut(&session.id)
            .ok_or_else(|| CoreError::not_found("session", session.id))?;
        *stored = session.clone();
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<()> {
        lock(&self.sessions, "session")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("session", id))
    }

    async fn get(&self, id: SessionId) -> Result<Session> {
        lock(&self.sessions, "session")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("session", id))
    }

    async fn list(&self, booth_id: BoothId, status: Option<SessionStatus>) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = lock(&self.sessions, "session")?
            .values()
            .filter(|s| s.booth_id == booth_id)
            .filter(|s| status.is_none_or(|status| s.status == status))
            .cloned()
            .collect();
        sessions.sort_by_key(|s| (s.started_at, s.id));
        Ok(sessions)
    }
}
