//! `PostgreSQL` photo, share link, frame and filter stores.

use crate::database_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use photobooth_core::model::{
    Filter, FilterId, Frame, FrameId, JsonObject, Photo, PhotoId, QrCode, QrCodeId, SessionId,
};
use photobooth_core::providers::{FilterRepository, FrameRepository, PhotoRepository};
use photobooth_core::{CoreError, Result};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

const PHOTO_COLUMNS: &str =
    "id, session_id, frame_id, filter_id, storage_url, composition, rendered_url, created_at";

const QR_CODE_COLUMNS: &str = "id, photo_id, hash, expire_at, created_at";

const FRAME_COLUMNS: &str = "id, name, theme, file_url, active, created_at";

const FILTER_COLUMNS: &str = "id, name, effect, active, created_at";

#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    session_id: Uuid,
    frame_id: Option<Uuid>,
    filter_id: Option<Uuid>,
    storage_url: String,
    composition: Json<JsonObject>,
    rendered_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: PhotoId(row.id),
            session_id: SessionId(row.session_id),
            frame_id: row.frame_id.map(FrameId),
            filter_id: row.filter_id.map(FilterId),
            storage_url: row.storage_url,
            composition: row.composition.0,
            rendered_url: row.rendered_url,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QrCodeRow {
    id: Uuid,
    photo_id: Uuid,
    hash: String,
    expire_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<QrCodeRow> for QrCode {
    fn from(row: QrCodeRow) -> Self {
        Self {
            id: QrCodeId(row.id),
            photo_id: PhotoId(row.photo_id),
            hash: row.hash,
            expire_at: row.expire_at,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FrameRow {
    id: Uuid,
    name: String,
    theme: Option<String>,
    file_url: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<FrameRow> for Frame {
    fn from(row: FrameRow) -> Self {
        Self {
            id: FrameId(row.id),
            name: row.name,
            theme: row.theme,
            file_url: row.file_url,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FilterRow {
    id: Uuid,
    name: String,
    effect: Json<JsonObject>,
    active: bool,
    created_at: DateTime<Utc>,
}

impl From<FilterRow> for Filter {
    fn from(row: FilterRow) -> Self {
        Self {
            id: FilterId(row.id),
            name: row.name,
            effect: row.effect.0,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

/// Count rows of `photos` whose `column` equals `id`.
async fn count_photos(pool: &PgPool, column: &str, id: Uuid) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM photos WHERE {column} = $1");
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| database_error("count photos", &e))?;
    usize::try_from(count).map_err(|e| CoreError::Database(format!("Invalid photo count: {e}")))
}

/// `PostgreSQL` photo repository. Share links are deleted with their photo
/// by `ON DELETE CASCADE`.
#[derive(Clone)]
pub struct PostgresPhotoRepository {
    pool: PgPool,
}

impl PostgresPhotoRepository {
    /// Create a new `PostgreSQL` photo repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PostgresPhotoRepository {
    async fn create(&self, photo: &Photo) -> Result<()> {
        let sql = format!("INSERT INTO photos ({PHOTO_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)");
        sqlx::query(&sql)
            .bind(photo.id.0)
            .bind(photo.session_id.0)
            .bind(photo.frame_id.map(|id| id.0))
            .bind(photo.filter_id.map(|id| id.0))
            .bind(&photo.storage_url)
            .bind(Json(&photo.composition))
            .bind(&photo.rendered_url)
            .bind(photo.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create photo", &e))?;
        Ok(())
    }

    async fn update(&self, photo: &Photo) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE photos
            SET frame_id = $2, filter_id = $3, storage_url = $4, composition = $5, rendered_url = $6
            WHERE id = $1
            ",
        )
        .bind(photo.id.0)
        .bind(photo.frame_id.map(|id| id.0))
        .bind(photo.filter_id.map(|id| id.0))
        .bind(&photo.storage_url)
        .bind(Json(&photo.composition))
        .bind(&photo.rendered_url)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update photo", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("photo", photo.id));
        }
        Ok(())
    }

    async fn delete(&self, id: PhotoId) -> Result<()> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete photo", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("photo", id));
        }
        Ok(())
    }

    async fn get(&self, id: PhotoId) -> Result<Photo> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get photo", &e))?
            .map(Photo::from)
            .ok_or_else(|| CoreError::not_found("photo", id))
    }

    async fn list_by_session(&self, session_id: SessionId) -> Result<Vec<Photo>> {
        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE session_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, PhotoRow>(&sql)
            .bind(session_id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list photos", &e))?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn count_with_frame(&self, frame_id: FrameId) -> Result<usize> {
        count_photos(&self.pool, "frame_id", frame_id.0).await
    }

    async fn count_with_filter(&self, filter_id: FilterId) -> Result<usize> {
        count_photos(&self.pool, "filter_id", filter_id.0).await
    }

    async fn create_qr_code(&self, code: &QrCode) -> Result<()> {
        let sql = format!("INSERT INTO qr_codes ({QR_CODE_COLUMNS}) VALUES ($1, $2, $3, $4, $5)");
        sqlx::query(&sql)
            .bind(code.id.0)
            .bind(code.photo_id.0)
            .bind(&code.hash)
            .bind(code.expire_at)
            .bind(code.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create qr code", &e))?;
        Ok(())
    }

    async fn get_qr_code(&self, hash: &str) -> Result<QrCode> {
        let sql = format!("SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE hash = $1");
        sqlx::query_as::<_, QrCodeRow>(&sql)
            .bind(hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get qr code", &e))?
            .map(QrCode::from)
            .ok_or_else(|| CoreError::not_found("qr code", hash))
    }

    async fn delete_qr_code(&self, id: QrCodeId) -> Result<()> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete qr code", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("qr code", id));
        }
        Ok(())
    }
}

/// `PostgreSQL` frame repository.
#[derive(Clone)]
pub struct PostgresFrameRepository {
    pool: PgPool,
}

impl PostgresFrameRepository {
    /// Create a new `PostgreSQL` frame repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FrameRepository for PostgresFrameRepository {
    async fn create(&self, frame: &Frame) -> Result<()> {
        let sql = format!("INSERT INTO frames ({FRAME_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)");
        sqlx::query(&sql)
            .bind(frame.id.0)
            .bind(&frame.name)
            .bind(&frame.theme)
            .bind(&frame.file_url)
            .bind(frame.active)
            .bind(frame.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create frame", &e))?;
        Ok(())
    }

    async fn update(&self, frame: &Frame) -> Result<()> {
        let result = sqlx::query(
            "UPDATE frames SET name = $2, theme = $3, file_url = $4, active = $5 WHERE id = $1",
        )
        .bind(frame.id.0)
        .bind(&frame.name)
        .bind(&frame.theme)
        .bind(&frame.file_url)
        .bind(frame.active)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("update frame", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("frame", frame.id));
        }
        Ok(())
    }

    async fn delete(&self, id: FrameId) -> Result<()> {
        let result = sqlx::query("DELETE FROM frames WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete frame", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("frame", id));
        }
        Ok(())
    }

    async fn get(&self, id: FrameId) -> Result<Frame> {
        let sql = format!("SELECT {FRAME_COLUMNS} FROM frames WHERE id = $1");
        sqlx::query_as::<_, FrameRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get frame", &e))?
            .map(Frame::from)
            .ok_or_else(|| CoreError::not_found("frame", id))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Frame>> {
        let sql = format!(
            "SELECT {FRAME_COLUMNS} FROM frames WHERE (NOT $1 OR active) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, FrameRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list frames", &e))?;

        Ok(rows.into_iter().map(Frame::from).collect())
    }
}

/// `PostgreSQL` filter repository.
#[derive(Clone)]
pub struct PostgresFilterRepository {
    pool: PgPool,
}

impl PostgresFilterRepository {
    /// Create a new `PostgreSQL` filter repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FilterRepository for PostgresFilterRepository {
    async fn create(&self, filter: &Filter) -> Result<()> {
        let sql = format!("INSERT INTO filters ({FILTER_COLUMNS}) VALUES ($1, $2, $3, $4, $5)");
        sqlx::query(&sql)
            .bind(filter.id.0)
            .bind(&filter.name)
            .bind(Json(&filter.effect))
            .bind(filter.active)
            .bind(filter.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("create filter", &e))?;
        Ok(())
    }

    async fn update(&self, filter: &Filter) -> Result<()> {
        let result =
            sqlx::query("UPDATE filters SET name = $2, effect = $3, active = $4 WHERE id = $1")
                .bind(filter.id.0)
                .bind(&filter.name)
                .bind(Json(&filter.effect))
                .bind(filter.active)
                .execute(&self.pool)
                .await
                .map_err(|e| database_error("update filter", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("filter", filter.id));
        }
        Ok(())
    }

    async fn delete(&self, id: FilterId) -> Result<()> {
        let result = sqlx::query("DELETE FROM filters WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("delete filter", &e))?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("filter", id));
        }
        Ok(())
    }

    async fn get(&self, id: FilterId) -> Result<Filter> {
        let sql = format!("SELECT {FILTER_COLUMNS} FROM filters WHERE id = $1");
        sqlx::query_as::<_, FilterRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("get filter", &e))?
            .map(Filter::from)
            .ok_or_else(|| CoreError::not_found("filter", id))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Filter>> {
        let sql = format!(
            "SELECT {FILTER_COLUMNS} FROM filters WHERE (NOT $1 OR active) ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, FilterRow>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("list filters", &e))?;

        Ok(rows.into_iter().map(Filter::from).collect())
    }
}
