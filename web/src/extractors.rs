//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID
//! - `BearerToken`: raw `Authorization: Bearer <token>` credential
//! - `AuthenticatedBooth`: a bearer token validated against live booth state
//! - `AppJson` / `AppQuery`: `Json` and `Query` whose rejections render as
//!   [`AppError`]
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     booth: AuthenticatedBooth,
//!     State(state): State<AppState>,
//!     AppJson(request): AppJson<RedeemRequest>,
//! ) -> Result<Json<RedemptionReceipt>, AppError> {
//!     tracing::info!(booth_id = %booth.booth_id, "Processing request");
//!     ...
//! }
//! ```

use crate::error::AppError;
use crate::middleware::{header_correlation_id, record_booth};
use crate::state::AppState;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use photobooth_core::model::{BoothId, BranchId};
use photobooth_core::CoreError;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Prefers the ID stored by [`assign_correlation_id`](crate::middleware::assign_correlation_id),
/// then the `X-Correlation-ID` header, and generates a UUID v4 otherwise.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        Ok(Self(
            header_correlation_id(&parts.headers).unwrap_or_else(Uuid::new_v4),
        ))
    }
}

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("invalid authorization format, expected 'Bearer <token>'")
            })?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Booth identity proven by a valid, current booth token.
///
/// Use this as a handler parameter to require booth authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedBooth {
    /// The authenticated booth.
    pub booth_id: BoothId,
    /// Branch the booth belonged to when the token was checked.
    pub branch_id: BranchId,
    /// Token version the credential was minted for.
    pub token_version: i32,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedBooth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        match state.authority.validate(&bearer.0).await {
            Ok(identity) => {
                record_booth(identity.booth_id);
                Ok(Self {
                    booth_id: identity.booth_id,
                    branch_id: identity.branch_id,
                    token_version: identity.token_version,
                })
            }
            Err(err) if err.is_auth_failure() => {
                tracing::debug!(error = %err, "Booth token rejected");
                Err(AppError::unauthorized(err.to_string()))
            }
            Err(CoreError::NotFound { .. }) => {
                tracing::debug!("Booth token refers to a deleted booth");
                Err(AppError::unauthorized(CoreError::InvalidToken.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// `Json` extractor whose rejection is an [`AppError`] (400).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejection is an [`AppError`] (400).
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn request_parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/sessions");
        if let Some(value) = authorization {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_bearer_token_extracted() {
        let mut parts = request_parts(Some("Bearer abc.def.ghi"));
        let token = BearerToken::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(token.0, "abc.def.ghi");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let mut parts = request_parts(None);
        let err = BearerToken::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let mut parts = request_parts(Some("Basic dXNlcjpwYXNz"));
        let err = BearerToken::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let mut parts = request_parts(Some("Bearer   "));
        let err = BearerToken::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.message(), "empty bearer token");
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let id = Uuid::new_v4();
        let mut parts = request_parts(None);
        parts.extensions.insert(id);
        let CorrelationId(found) = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(found, id);
    }
}
