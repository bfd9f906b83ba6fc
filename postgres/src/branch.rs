//! `PostgreSQL` branch store.

use crate::database_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{Branch, BranchId};
use photobooth_core::providers::BranchRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct BranchRow {
    id: Uuid,
    name: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Self {
            id: BranchId(row.id),
            name: row.name,
            location: row.location,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` branch repository.
#[derive(Clone)]
pub struct PostgresBranchRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresBranchRepository {
    /// Create a new `PostgreSQL` branch repository.
    ///
    /// # Arguments
    ///
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BranchRepository for PostgresBranchRepository {
    async fn create(&self, branch: &Branch) -> Result<()> {
        sqlx::query("INSERT INTO branches (id, name, location, created_at) VALUES ($1, $2, $3, $4)")
            .bind(branch.id.0)
            .bind(&branch.name)
            .bind(&branch.location)
            .bind(branch.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create branch", &e))?;
        Ok(())
    }

    async fn update(&self, branch: &Branch) -> Result<()> {
        let result = sqlx::query("UPDATE branches SET name = $2, location = $3 WHERE id = $1")
            .bind(branch.id.0)
            .bind(&branch.name)
            .bind(&branch.location)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("update branch", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("branch", branch.id));
        }
        Ok(())
    }

    async fn delete(&self, id: BranchId) -> Result<()> {
        let result = sqlx::query("DELETE FROM branches WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete branch", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("branch", id));
        }
        Ok(())
    }

    async fn get(&self, id: BranchId) -> Result<Branch> {
        sqlx::query_as::<_, BranchRow>(
            "SELECT id, name, location, created_at FROM branches WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("get branch", &e))?
        .map(Branch::from)
        .ok_or_else(|| CoreError::not_found("branch", id))
    }

    async fn list(&self) -> Result<Vec<Branch>> {
        let rows = sqlx::query_as::<_, BranchRow>(
            "SELECT id, name, location, created_at FROM branches ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("list branches", &e))?;

        Ok(rows.into_iter().map(Branch::from).collect())
    }
}
