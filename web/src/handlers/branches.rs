//! Branch endpoints.
//!
//! - POST /api/branches
//! - GET /api/branches
//! - GET /api/branches/:id
//! - PUT /api/branches/:id
//! - DELETE /api/branches/:id

use crate::error::AppError;
use crate::extractors::AppJson;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{Branch, BranchId};
use photobooth_core::services::{CreateBranch, UpdateBranch};

/// Create a branch.
pub async fn create_branch(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateBranch>,
) -> Result<(StatusCode, Json<Branch>), AppError> {
    let branch = state.branches.create(request).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}

/// List every branch.
pub async fn list_branches(State(state): State<AppState>) -> Result<Json<Vec<Branch>>, AppError> {
    Ok(Json(state.branches.list().await?))
}

/// Get a branch by ID.
pub async fn get_branch(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Branch>, AppError> {
    let id = BranchId::parse(&id)?;
    Ok(Json(state.branches.get(id).await?))
}

/// Replace a branch's name and location.
pub async fn update_branch(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateBranch>,
) -> Result<Json<Branch>, AppError> {
    let id = BranchId::parse(&id)?;
    Ok(Json(state.branches.update(id, request).await?))
}

/// Delete a branch.
pub async fn delete_branch(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = BranchId::parse(&id)?;
    state.branches.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
