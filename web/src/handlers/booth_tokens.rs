//! Booth token endpoints.
//!
//! - POST /api/booth/register - issue a token for a booth (no auth)
//! - POST /api/booth/regenerate-token - revoke every older token (booth auth)

use crate::error::AppError;
use crate::extractors::{AppJson, AuthenticatedBooth};
use crate::state::AppState;
use axum::{extract::State, Json};
use photobooth_core::model::{BoothId, BranchId};
use serde::{Deserialize, Serialize};

/// Request to register a booth.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    /// Booth to register.
    #[serde(default)]
    pub booth_id: Option<String>,
    /// Branch the booth claims to belong to.
    #[serde(default)]
    pub branch_id: Option<String>,
}

/// A freshly signed booth token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Bearer credential.
    pub token: String,
}

/// Issue a token for a booth.
///
/// The first registration initializes the booth's token version; later
/// calls re-sign the current version without revoking anything.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/booth/register \
///   -H "Content-Type: application/json" \
///   -d '{"booth_id": "<uuid>", "branch_id": "<uuid>"}'
/// ```
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let (Some(booth_id), Some(branch_id)) = (
        request.booth_id.filter(|id| !id.trim().is_empty()),
        request.branch_id.filter(|id| !id.trim().is_empty()),
    ) else {
        return Err(AppError::bad_request("booth_id and branch_id required"));
    };

    let booth_id = BoothId::parse(&booth_id)?;
    let branch_id = BranchId::parse(&branch_id)?;

    let token = state.authority.register(booth_id, Some(branch_id)).await?;
    Ok(Json(TokenResponse { token }))
}

/// Issue a new token and invalidate every token issued before it.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/booth/regenerate-token \
///   -H "Authorization: Bearer <booth_token>"
/// ```
pub async fn regenerate(
    booth: AuthenticatedBooth,
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.authority.regenerate(booth.booth_id).await?;
    Ok(Json(TokenResponse { token }))
}
