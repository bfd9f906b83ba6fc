//! In-memory user store.

use super::lock;
use crate::error::{CoreError, Result};
use crate::model::{User, UserId};
use crate::providers::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory [`UserRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(users: &HashMap<UserId, User>, user: &User) -> Result<()> {
    for other in users.values().filter(|u| u.id != user.id) {
        if user.tel.is_some() && other.tel == user.tel {
            return Err(CoreError::Conflict("phone number already registered".to_string()));
        }
        if user.email.is_some() && other.email == user.email {
            return Err(CoreError::Conflict("email already registered".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        let mut users = lock(&self.users, "user")?;
        if users.contains_key(&user.id) {
            return Err(CoreError::Conflict(format!("user {} already exists", user.id)));
        }
        check_unique(&users, user)?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut users = lock(&self.users, "user")?;
        if !users.contains_key(&user.id) {
            return Err(CoreError::not_found("user", user.id));
        }
        check_unique(&users, user)?;
        if let Some(stored) = users.get_mut(&user.id) {
            stored.tel.clone_from(&user.tel);
            stored.email.clone_from(&user.email);
            stored.role = user.role;
            stored.updated_at = user.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        lock(&self.users, "user")?
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    async fn get(&self, id: UserId) -> Result<User> {
        lock(&self.users, "user")?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        lock(&self.users, "user")?
            .values()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
            .ok_or_else(|| CoreError::not_found("user", email))
    }

    async fn list(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = lock(&self.users, "user")?.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn adjust_points(
        &self,
        id: UserId,
        delta: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let mut users = lock(&self.users, "user")?;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| CoreError::not_found("user", id))?;
        match user.points.checked_add(delta) {
            Some(points) if points >= 0 => {
                user.points = points;
                user.updated_at = updated_at;
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }
}
