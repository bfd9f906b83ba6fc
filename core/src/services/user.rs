//! Customer and staff accounts with a loyalty point balance.

use crate::environment::Clock;
use crate::error::{CoreError, Result};
use crate::model::{User, UserId, UserRole};
use crate::providers::UserRepository;
use crate::validation::require_non_empty;
use serde::Deserialize;
use std::sync::Arc;

/// Input for [`UserService::create`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    /// Phone number.
    #[serde(default)]
    pub tel: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Role, `customer` when omitted.
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Input for [`UserService::update`]. Absent fields are left unchanged;
/// points move only through [`UserService::adjust_points`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    /// Phone number.
    #[serde(default)]
    pub tel: Option<String>,

    /// Email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Role.
    #[serde(default)]
    pub role: Option<UserRole>,
}

fn validate_contact(tel: Option<&str>, email: Option<&str>) -> Result<()> {
    if let Some(tel) = tel {
        require_non_empty("tel", tel)?;
    }
    if let Some(email) = email {
        require_non_empty("email", email)?;
        if !email.contains('@') {
            return Err(CoreError::Validation(format!("invalid email: {email}")));
        }
    }
    Ok(())
}

/// Account CRUD and point adjustments.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    /// Create the service.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Register an account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank phone number or malformed email,
    /// `Conflict` if either is already registered.
    pub async fn create(&self, input: CreateUser) -> Result<User> {
        validate_contact(input.tel.as_deref(), input.email.as_deref())?;

        let now = self.clock.now();
        let user = User {
            id: UserId::new(),
            tel: input.tel,
            email: input.email,
            role: input.role.unwrap_or_default(),
            points: 0,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Validation` or `Conflict` as
    /// for [`UserService::create`].
    pub async fn update(&self, id: UserId, input: UpdateUser) -> Result<User> {
        validate_contact(input.tel.as_deref(), input.email.as_deref())?;

        let mut user = self.users.get(id).await?;
        if input.tel.is_some() {
            user.tel = input.tel;
        }
        if input.email.is_some() {
            user.email = input.email;
        }
        if let Some(role) = input.role {
            user.role = role;
        }
        user.updated_at = self.clock.now();

        self.users.update(&user).await?;
        // Re-read so the returned balance is the stored one.
        self.users.get(id).await
    }

    /// Add `delta` points (negative to spend).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id, `Validation` if the balance
    /// would go negative.
    pub async fn adjust_points(&self, id: UserId, delta: i32) -> Result<User> {
        let user = self
            .users
            .adjust_points(id, delta, self.clock.now())
            .await?
            .ok_or_else(|| CoreError::Validation("points cannot be negative".to_string()))?;

        tracing::info!(user_id = %id, delta, points = user.points, "Points adjusted");
        Ok(user)
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Fetch an account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.users.get(id).await
    }

    /// Fetch an account by email.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown email.
    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        self.users.get_by_email(email).await
    }

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }
}
