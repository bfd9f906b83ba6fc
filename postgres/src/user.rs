//! `PostgreSQL` user store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{User, UserId};
use photobooth_core::providers::UserRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use uuid::Uuid;

const COLUMNS: &str = "id, tel, email, role, points, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    tel: Option<String>,
    email: Option<String>,
    role: String,
    points: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = CoreError;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(Self {
            id: UserId(row.id),
            tel: row.tel,
            email: row.email,
            role: row.role.parse().map_err(|e| corrupt_row("users.role", &e))?,
            points: row.points,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `PostgreSQL` user repository.
///
/// # Concurrency
///
/// [`UserRepository::adjust_points`] is one conditional
/// `UPDATE ... RETURNING`; the balance check and the write cannot be
/// separated by a concurrent adjustment.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new `PostgreSQL` user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<()> {
        let sql = format!("INSERT INTO users ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)");
        sqlx::query(&sql)
            .bind(user.id.0)
            .bind(&user.tel)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(user.points)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create user", &e))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            "UPDATE users SET tel = $2, email = $3, role = $4, updated_at = $5 WHERE id = $1",
        )
        .bind(user.id.0)
        .bind(&user.tel)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update user", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("user", user.id));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete user", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("user", id));
        }
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<User> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get user", &e))?
            .ok_or_else(|| CoreError::not_found("user", id))?
            .try_into()
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get user by email", &e))?
            .ok_or_else(|| CoreError::not_found("user", email))?
            .try_into()
    }

    async fn list(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list users", &e))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn adjust_points(
        &self,
        id: UserId,
        delta: i32,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>> {
        // Widened so an overflowing balance is refused instead of raising.
        let sql = format!(
            r"
            UPDATE users
            SET points = points + $2, updated_at = $3
            WHERE id = $1 AND points::bigint + $2 BETWEEN 0 AND 2147483647
            RETURNING {COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .bind(delta)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("adjust points", &e))?;

        if let Some(row) = row {
            return User::try_from(row).map(Some);
        }

        // Distinguish "would go negative" from "no such user".
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("check user", &e))?
            .is_some();
        if exists {
            Ok(None)
        } else {
            Err(CoreError::not_found("user", id))
        }
    }
}
