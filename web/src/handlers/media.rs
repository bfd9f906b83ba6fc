//! Media endpoints.
//!
//! Photos require booth authentication and are reachable only through a
//! session of the calling booth:
//!
//! - POST /api/media/photos
//! - GET /api/media/photos?session_id=
//! - GET /api/media/photos/:id
//! - PUT /api/media/photos/:id
//! - DELETE /api/media/photos/:id
//!
//! The frame and filter catalogs and share links are open:
//!
//! - POST, GET /api/media/frames (`?active=true` lists offered frames)
//! - GET, PUT, DELETE /api/media/frames/:id
//! - POST, GET /api/media/filters
//! - GET, PUT, DELETE /api/media/filters/:id
//! - POST /api/media/qrcodes
//! - GET /api/media/qrcodes/:hash
//! - DELETE /api/media/qrcodes/:id

use super::sessions::owned_session;
use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery, AuthenticatedBooth};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{
    Filter, FilterId, Frame, FrameId, Photo, PhotoId, QrCode, QrCodeId, SessionId,
};
use photobooth_core::services::{
    CreateFilter, CreateFrame, CreatePhoto, CreateQrCode, UpdateFilter, UpdateFrame, UpdatePhoto,
};
use serde::Deserialize;

/// Query parameters for listing photos.
#[derive(Debug, Deserialize)]
pub struct ListPhotosQuery {
    /// Session whose photos to list.
    pub session_id: SessionId,
}

/// Query parameters for listing catalog entries.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Only entries offered to customers.
    #[serde(default)]
    pub active: bool,
}

/// Load a photo and check its session was run by `booth`.
async fn owned_photo(
    state: &AppState,
    booth: &AuthenticatedBooth,
    id: PhotoId,
) -> Result<Photo, AppError> {
    let photo = state.photos.get(id).await?;
    owned_session(state, booth, photo.session_id).await?;
    Ok(photo)
}

/// Store a photo taken in one of the authenticated booth's sessions.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/media/photos \
///   -H "Authorization: Bearer <booth_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"session_id": "<uuid>", "storage_url": "s3://captures/1.jpg"}'
/// ```
pub async fn create_photo(
    booth: AuthenticatedBooth,
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePhoto>,
) -> Result<(StatusCode, Json<Photo>), AppError> {
    owned_session(&state, &booth, request.session_id).await?;
    let photo = state.photos.create(request).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

/// List the photos of one of the authenticated booth's sessions.
pub async fn list_photos(
    booth: AuthenticatedBooth,
    AppQuery(query): AppQuery<ListPhotosQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Photo>>, AppError> {
    owned_session(&state, &booth, query.session_id).await?;
    Ok(Json(state.photos.list_by_session(query.session_id).await?))
}

/// Get a photo.
pub async fn get_photo(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Photo>, AppError> {
    let id = PhotoId::parse(&id)?;
    Ok(Json(owned_photo(&state, &booth, id).await?))
}

/// Partially update a photo.
pub async fn update_photo(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdatePhoto>,
) -> Result<Json<Photo>, AppError> {
    let id = PhotoId::parse(&id)?;
    owned_photo(&state, &booth, id).await?;
    Ok(Json(state.photos.update(id, request).await?))
}

/// Delete a photo and its share links.
pub async fn delete_photo(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = PhotoId::parse(&id)?;
    owned_photo(&state, &booth, id).await?;
    state.photos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a frame to the catalog.
pub async fn create_frame(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateFrame>,
) -> Result<(StatusCode, Json<Frame>), AppError> {
    let frame = state.frames.create(request).await?;
    Ok((StatusCode::CREATED, Json(frame)))
}

/// List frames.
pub async fn list_frames(
    AppQuery(query): AppQuery<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Frame>>, AppError> {
    Ok(Json(state.frames.list(query.active).await?))
}

/// Get a frame.
pub async fn get_frame(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Frame>, AppError> {
    let id = FrameId::parse(&id)?;
    Ok(Json(state.frames.get(id).await?))
}

/// Replace a frame.
pub async fn update_frame(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateFrame>,
) -> Result<Json<Frame>, AppError> {
    let id = FrameId::parse(&id)?;
    Ok(Json(state.frames.update(id, request).await?))
}

/// Delete a frame no photo uses.
pub async fn delete_frame(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = FrameId::parse(&id)?;
    state.frames.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a filter to the catalog.
pub async fn create_filter(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateFilter>,
) -> Result<(StatusCode, Json<Filter>), AppError> {
    let filter = state.filters.create(request).await?;
    Ok((StatusCode::CREATED, Json(filter)))
}

/// List filters.
pub async fn list_filters(
    AppQuery(query): AppQuery<CatalogQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Filter>>, AppError> {
    Ok(Json(state.filters.list(query.active).await?))
}

/// Get a filter.
pub async fn get_filter(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Filter>, AppError> {
    let id = FilterId::parse(&id)?;
    Ok(Json(state.filters.get(id).await?))
}

/// Replace a filter.
pub async fn update_filter(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateFilter>,
) -> Result<Json<Filter>, AppError> {
    let id = FilterId::parse(&id)?;
    Ok(Json(state.filters.update(id, request).await?))
}

/// Delete a filter no photo uses.
pub async fn delete_filter(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = FilterId::parse(&id)?;
    state.filters.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a share link for a photo.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/media/qrcodes \
///   -H "Content-Type: application/json" \
///   -d '{"photo_id": "<uuid>", "hash": "k3y", "expire_at": 1767225600}'
/// ```
pub async fn create_qr_code(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateQrCode>,
) -> Result<(StatusCode, Json<QrCode>), AppError> {
    let code = state.photos.create_qr_code(request).await?;
    Ok((StatusCode::CREATED, Json(code)))
}

/// Resolve a share link by hash. Expired links are 404.
pub async fn get_qr_code(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<QrCode>, AppError> {
    Ok(Json(state.photos.resolve_qr_code(&hash).await?))
}

/// Delete a share link by ID.
pub async fn delete_qr_code(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = QrCodeId::parse(&id)?;
    state.photos.delete_qr_code(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
