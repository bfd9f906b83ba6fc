//! `PostgreSQL` booth store.

use crate::{corrupt_row, database_error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{Booth, BoothId, BranchId, JsonObject};
use photobooth_core::providers::BoothRepository;
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

const COLUMNS: &str = "id, branch_id, name, type, status, config, token_version, created_at";

#[derive(sqlx::FromRow)]
struct BoothRow {
    id: Uuid,
    branch_id: Uuid,
    name: String,
    #[sqlx(rename = "type")]
    booth_type: String,
    status: String,
    config: Json<JsonObject>,
    token_version: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<BoothRow> for Booth {
    type Error = CoreError;

    fn try_from(row: BoothRow) -> Result<Self> {
        Ok(Self {
            id: BoothId(row.id),
            branch_id: BranchId(row.branch_id),
            name: row.name,
            booth_type: row.booth_type.parse().map_err(|e| corrupt_row("booths.type", &e))?,
            status: row.status.parse().map_err(|e| corrupt_row("booths.status", &e))?,
            config: row.config.0,
            token_version: row.token_version,
            created_at: row.created_at,
        })
    }
}

/// `PostgreSQL` booth repository.
///
/// `token_version` changes only through single conditional `UPDATE`
/// statements, so concurrent registrations and regenerations serialize on
/// the row lock.
#[derive(Clone)]
pub struct PostgresBoothRepository {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresBoothRepository {
    /// Create a new `PostgreSQL` booth repository.
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
impl BoothRepository for PostgresBoothRepository {
    async fn create(&self, booth: &Booth) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO booths (id, branch_id, name, type, status, config, token_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(booth.id.0)
        .bind(booth.branch_id.0)
        .bind(&booth.name)
        .bind(booth.booth_type.as_str())
        .bind(booth.status.as_str())
        .bind(Json(&booth.config))
        .bind(booth.token_version)
        .bind(booth.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("create booth", &e))?;
        Ok(())
    }

    async fn update(&self, booth: &Booth) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE booths
            SET branch_id = $2, name = $3, type = $4, status = $5, config = $6
            WHERE id = $1
            ",
        )
        .bind(booth.id.0)
        .bind(booth.branch_id.0)
        .bind(&booth.name)
        .bind(booth.booth_type.as_str())
        .bind(booth.status.as_str())
        .bind(Json(&booth.config))
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update booth", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("booth", booth.id));
        }
        Ok(())
    }

    async fn delete(&self, id: BoothId) -> Result<()> {
        let result = sqlx::query("DELETE FROM booths WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete booth", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("booth", id));
        }
        Ok(())
    }

    async fn get(&self, id: BoothId) -> Result<Booth> {
        let sql = format!("SELECT {COLUMNS} FROM booths WHERE id = $1");
        sqlx::query_as::<_, BoothRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get booth", &e))?
            .ok_or_else(|| CoreError::not_found("booth", id))?
            .try_into()
    }

    async fn list(&self, branch_id: Option<BranchId>) -> Result<Vec<Booth>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM booths WHERE ($1::uuid IS NULL OR branch_id = $1) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, BoothRow>(&sql)
            .bind(branch_id.map(|id| id.0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list booths", &e))?;

        rows.into_iter().map(Booth::try_from).collect()
    }

    async fn initialize_token_version(&self, id: BoothId) -> Result<Booth> {
        sqlx::query("UPDATE booths SET token_version = 1 WHERE id = $1 AND token_version = 0")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("initialize booth token version", &e))?;

        // Whether or not this call won the 0 -> 1 transition, the row now
        // holds a positive version.
        self.get(id).await
    }

    async fn bump_token_version(&self, id: BoothId) -> Result<Booth> {
        let sql = format!(
            r"
            UPDATE booths
            SET token_version = CASE
                WHEN token_version < 0 OR token_version = 2147483647 THEN 1
                ELSE token_version + 1
            END
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        );
        let booth: Booth = sqlx::query_as::<_, BoothRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("bump booth token version", &e))?
            .ok_or_else(|| CoreError::not_found("booth", id))?
            .try_into()?;

        tracing::debug!(booth_id = %id, token_version = booth.token_version, "Booth token version bumped");
        Ok(booth)
    }
}
