//! Voucher endpoints.
//!
//! - POST /api/vouchers
//! - GET /api/vouchers?active=true
//! - GET /api/vouchers/:id
//! - PUT /api/vouchers/:id
//! - DELETE /api/vouchers/:id
//! - GET /api/vouchers/code/:code
//! - GET /api/vouchers/:id/redemptions
//! - POST /api/vouchers/redeem (booth auth)

use super::sessions::owned_session;
use crate::error::AppError;
use crate::extractors::{AppJson, AppQuery, AuthenticatedBooth, CorrelationId};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{NewRedemption, Redemption, SessionId, Voucher, VoucherId};
use photobooth_core::services::{CreateVoucher, UpdateVoucher};
use photobooth_core::validation::validate_amount;
use photobooth_core::RedemptionReceipt;
use serde::Deserialize;

/// Query parameters for listing vouchers.
#[derive(Debug, Default, Deserialize)]
pub struct ListVouchersQuery {
    /// `true` or `1` lists active vouchers only.
    pub active: Option<String>,
}

impl ListVouchersQuery {
    fn active_only(&self) -> bool {
        matches!(self.active.as_deref(), Some("true" | "1"))
    }
}

/// Request to redeem a voucher for a session.
#[derive(Debug, Default, Deserialize)]
pub struct RedeemRequest {
    /// Voucher code.
    #[serde(default)]
    pub code: String,
    /// Session the voucher applies to.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Customer phone number.
    #[serde(default)]
    pub tel: Option<String>,
    /// Amount actually applied.
    #[serde(default)]
    pub discount: Option<f64>,
}

/// Create a voucher.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/vouchers \
///   -H "Content-Type: application/json" \
///   -d '{"code": "WELCOME50", "type": "discount", "value": 50, "unit": "percent", "max_usage": 1}'
/// ```
pub async fn create_voucher(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateVoucher>,
) -> Result<(StatusCode, Json<Voucher>), AppError> {
    let voucher = state.vouchers.create(request).await?;
    Ok((StatusCode::CREATED, Json(voucher)))
}

/// List vouchers.
pub async fn list_vouchers(
    AppQuery(query): AppQuery<ListVouchersQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Voucher>>, AppError> {
    Ok(Json(state.vouchers.list(query.active_only()).await?))
}

/// Get a voucher by ID.
pub async fn get_voucher(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Voucher>, AppError> {
    let id = VoucherId::parse(&id)?;
    Ok(Json(state.vouchers.get(id).await?))
}

/// Get a voucher by its code.
pub async fn get_voucher_by_code(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Voucher>, AppError> {
    Ok(Json(state.vouchers.get_by_code(&code).await?))
}

/// Partially update a voucher. `used_count` is never writable.
pub async fn update_voucher(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateVoucher>,
) -> Result<Json<Voucher>, AppError> {
    let id = VoucherId::parse(&id)?;
    Ok(Json(state.vouchers.update(id, request).await?))
}

/// Delete a voucher and its redemptions.
pub async fn delete_voucher(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = VoucherId::parse(&id)?;
    state.vouchers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a voucher's redemptions, oldest first.
pub async fn list_redemptions(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Redemption>>, AppError> {
    let id = VoucherId::parse(&id)?;
    Ok(Json(state.vouchers.list_redemptions(id).await?))
}

/// Redeem a voucher for one of the authenticated booth's sessions.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/vouchers/redeem \
///   -H "Authorization: Bearer <booth_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"code": "WELCOME50", "session_id": "<uuid>", "tel": "0812345678"}'
/// ```
pub async fn redeem_voucher(
    booth: AuthenticatedBooth,
    correlation_id: CorrelationId,
    State(state): State<AppState>,
    AppJson(request): AppJson<RedeemRequest>,
) -> Result<Json<RedemptionReceipt>, AppError> {
    let code = request.code.trim();
    let Some(session_id) = request.session_id.filter(|_| !code.is_empty()) else {
        return Err(AppError::bad_request("code and session_id required"));
    };
    if let Some(discount) = request.discount {
        validate_amount("discount", discount)?;
    }

    owned_session(&state, &booth, session_id).await?;

    tracing::debug!(
        correlation_id = %correlation_id.0,
        booth_id = %booth.booth_id,
        voucher_code = code,
        "Redeeming voucher"
    );

    let receipt = state
        .ledger
        .redeem(
            code,
            NewRedemption {
                session_id,
                tel: request.tel,
                discount: request.discount,
            },
        )
        .await?;

    Ok(Json(receipt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_filter_values() {
        let query = |active: Option<&str>| ListVouchersQuery {
            active: active.map(str::to_string),
        };
        assert!(query(Some("true")).active_only());
        assert!(query(Some("1")).active_only());
        assert!(!query(Some("false")).active_only());
        assert!(!query(Some("0")).active_only());
        assert!(!query(None).active_only());
    }
}
