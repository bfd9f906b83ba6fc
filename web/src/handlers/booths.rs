//! Booth endpoints.
//!
//! - POST /api/booths
//! - GET /api/booths?branch_id=
//! - GET /api/booths/:id
//! - PUT /api/booths/:id
//! - DELETE /api/booths/:id
//! - POST /api/booths/:id/logs
//! - GET /api/booths/:id/logs?limit=
//! - POST /api/booths/:id/analytics
//! - GET /api/booths/:id/analytics?limit=

use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{AnalyticsEvent, Booth, BoothId, BoothLog, BranchId};
use photobooth_core::services::{CreateBooth, RecordEvent, RecordLog, UpdateBooth};
use serde::Deserialize;

/// Query parameters for listing booths.
#[derive(Debug, Default, Deserialize)]
pub struct ListBoothsQuery {
    /// Only booths of this branch.
    pub branch_id: Option<BranchId>,
}

/// Query parameters for telemetry listings.
#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    /// Maximum entries, newest first. Omitted or zero uses the default.
    pub limit: Option<usize>,
}

/// Create a booth in an existing branch.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/booths \
///   -H "Content-Type: application/json" \
///   -d '{"branch_id": "<uuid>", "name": "Booth A", "type": "physical"}'
/// ```
pub async fn create_booth(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateBooth>,
) -> Result<(StatusCode, Json<Booth>), AppError> {
    let booth = state.booths.create(request).await?;
    Ok((StatusCode::CREATED, Json(booth)))
}

/// List booths, optionally filtered by branch.
pub async fn list_booths(
    AppQuery(query): AppQuery<ListBoothsQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Booth>>, AppError> {
    Ok(Json(state.booths.list(query.branch_id).await?))
}

/// Get a booth by ID.
pub async fn get_booth(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Booth>, AppError> {
    let id = BoothId::parse(&id)?;
    Ok(Json(state.booths.get(id).await?))
}

/// Update a booth. Moving it to another branch invalidates its tokens.
pub async fn update_booth(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateBooth>,
) -> Result<Json<Booth>, AppError> {
    let id = BoothId::parse(&id)?;
    Ok(Json(state.booths.update(id, request).await?))
}

/// Delete a booth.
pub async fn delete_booth(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = BoothId::parse(&id)?;
    state.booths.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Append an operational log entry.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/booths/<uuid>/logs \
///   -H "Content-Type: application/json" \
///   -d '{"event_type": "printer_jam", "level": "error"}'
/// ```
pub async fn record_log(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<RecordLog>,
) -> Result<(StatusCode, Json<BoothLog>), AppError> {
    let id = BoothId::parse(&id)?;
    let entry = state.telemetry.record_log(id, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Recent log entries of a booth.
pub async fn list_logs(
    Path(id): Path<String>,
    AppQuery(query): AppQuery<RecentQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<BoothLog>>, AppError> {
    let id = BoothId::parse(&id)?;
    Ok(Json(state.telemetry.recent_logs(id, query.limit).await?))
}

/// Append an analytics event.
pub async fn record_event(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<RecordEvent>,
) -> Result<(StatusCode, Json<AnalyticsEvent>), AppError> {
    let id = BoothId::parse(&id)?;
    let event = state.telemetry.record_event(id, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Recent analytics events of a booth.
pub async fn list_events(
    Path(id): Path<String>,
    AppQuery(query): AppQuery<RecentQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalyticsEvent>>, AppError> {
    let id = BoothId::parse(&id)?;
    Ok(Json(state.telemetry.recent_events(id, query.limit).await?))
}
