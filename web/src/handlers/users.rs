//! User endpoints.
//!
//! - POST /api/users
//! - GET /api/users?email=
//! - GET /api/users/:id
//! - PUT /api/users/:id
//! - DELETE /api/users/:id
//! - POST /api/users/:id/points

use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{User, UserId};
use photobooth_core::services::{CreateUser, UpdateUser};
use serde::Deserialize;

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Only the account registered with this email.
    pub email: Option<String>,
}

/// Body of a points adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustPointsRequest {
    /// Points to add; negative to spend.
    pub delta: i32,
}

/// Register an account.
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = state.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List accounts, or look one up by email.
pub async fn list_users(
    AppQuery(query): AppQuery<ListUsersQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    match query.email {
        Some(email) => Ok(Json(vec![state.users.get_by_email(&email).await?])),
        None => Ok(Json(state.users.list().await?)),
    }
}

/// Get an account by ID.
pub async fn get_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    let id = UserId::parse(&id)?;
    Ok(Json(state.users.get(id).await?))
}

/// Partially update an account.
pub async fn update_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let id = UserId::parse(&id)?;
    Ok(Json(state.users.update(id, request).await?))
}

/// Delete an account.
pub async fn delete_user(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = UserId::parse(&id)?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add or spend loyalty points.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/users/<uuid>/points \
///   -H "Content-Type: application/json" \
///   -d '{"delta": -20}'
/// ```
pub async fn adjust_points(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<AdjustPointsRequest>,
) -> Result<Json<User>, AppError> {
    let id = UserId::parse(&id)?;
    Ok(Json(state.users.adjust_points(id, request.delta).await?))
}
