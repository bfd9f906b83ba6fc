//! Session endpoints. All require booth authentication, and a booth only
//! ever sees its own sessions.
//!
//! - POST /api/sessions
//! - GET /api/sessions?booth_id=&status=
//! - GET /api/sessions/:id
//! - PUT /api/sessions/:id
//! - DELETE /api/sessions/:id
//! - GET /api/sessions/:id/photos
//! - GET /api/sessions/:id/payment

use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery, AuthenticatedBooth};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{BoothId, Payment, Photo, Session, SessionId, SessionStatus};
use photobooth_core::services::{CreateSession, UpdateSession};
use serde::Deserialize;

/// Query parameters for listing sessions.
#[derive(Debug, Default, Deserialize)]
pub struct ListSessionsQuery {
    /// Must be the authenticated booth when present.
    pub booth_id: Option<BoothId>,
    /// Only sessions in this status.
    pub status: Option<SessionStatus>,
}

const FOREIGN_SESSION: &str = "session does not belong to this booth";

/// Load a session and check it was run by `booth`.
pub(crate) async fn owned_session(
    state: &AppState,
    booth: &AuthenticatedBooth,
    id: SessionId,
) -> Result<Session, AppError> {
    let session = state.sessions.get(id).await?;
    if !session.belongs_to(booth.booth_id) {
        tracing::warn!(
            session_id = %id,
            booth_id = %booth.booth_id,
            owner = %session.booth_id,
            "Booth tried to access another booth's session"
        );
        return Err(AppError::forbidden(FOREIGN_SESSION));
    }
    Ok(session)
}

/// Start a session on the authenticated booth.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/sessions \
///   -H "Authorization: Bearer <booth_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"total_price": 150}'
/// ```
pub async fn create_session(
    booth: AuthenticatedBooth,
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSession>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    if request.booth_id.is_some_and(|id| id != booth.booth_id) {
        return Err(AppError::forbidden("cannot create a session for another booth"));
    }

    let session = state.sessions.create(booth.booth_id, request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// List the authenticated booth's sessions.
pub async fn list_sessions(
    booth: AuthenticatedBooth,
    AppQuery(query): AppQuery<ListSessionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Session>>, AppError> {
    if query.booth_id.is_some_and(|id| id != booth.booth_id) {
        return Err(AppError::forbidden("cannot list another booth's sessions"));
    }

    Ok(Json(state.sessions.list(booth.booth_id, query.status).await?))
}

/// Get one of the authenticated booth's sessions.
pub async fn get_session(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Session>, AppError> {
    let id = SessionId::parse(&id)?;
    Ok(Json(owned_session(&state, &booth, id).await?))
}

/// Partially update one of the authenticated booth's sessions.
pub async fn update_session(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateSession>,
) -> Result<Json<Session>, AppError> {
    let id = SessionId::parse(&id)?;
    owned_session(&state, &booth, id).await?;
    Ok(Json(state.sessions.update(id, request).await?))
}

/// Delete one of the authenticated booth's sessions.
pub async fn delete_session(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = SessionId::parse(&id)?;
    owned_session(&state, &booth, id).await?;
    state.sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Photos taken in one of the authenticated booth's sessions.
pub async fn list_session_photos(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let id = SessionId::parse(&id)?;
    owned_session(&state, &booth, id).await?;
    Ok(Json(state.photos.list_by_session(id).await?))
}

/// Payment of one of the authenticated booth's sessions.
pub async fn get_session_payment(
    booth: AuthenticatedBooth,
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Payment>, AppError> {
    let id = SessionId::parse(&id)?;
    owned_session(&state, &booth, id).await?;
    Ok(Json(state.payments.get_by_session(id).await?))
}
