//! Payment endpoints.
//!
//! - POST /api/payments
//! - GET /api/payments/:id
//! - PUT /api/payments/:id
//! - GET /api/payments/session/:session_id

use crate::error::AppError;
use crate::extractors::AppJson;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use photobooth_core::model::{Payment, PaymentId, SessionId};
use photobooth_core::services::{CreatePayment, UpdatePayment};

/// Record the payment of a session.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/payments \
///   -H "Content-Type: application/json" \
///   -d '{"session_id": "<uuid>", "method": "qr", "amount": 150}'
/// ```
pub async fn create_payment(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePayment>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payment = state.payments.create(request).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Get a payment by ID.
pub async fn get_payment(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Payment>, AppError> {
    let id = PaymentId::parse(&id)?;
    Ok(Json(state.payments.get(id).await?))
}

/// Partially update a payment, typically its status.
pub async fn update_payment(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdatePayment>,
) -> Result<Json<Payment>, AppError> {
    let id = PaymentId::parse(&id)?;
    Ok(Json(state.payments.update(id, request).await?))
}

/// Get the payment of a session.
pub async fn get_session_payment(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Payment>, AppError> {
    let session_id = SessionId::parse(&session_id)?;
    Ok(Json(state.payments.get_by_session(session_id).await?))
}
