//! Request correlation and the per-request span.
//!
//! [`assign_correlation_id`] runs outermost. It keeps the `X-Correlation-ID`
//! header when it holds a UUID and mints a UUID v4 otherwise, stores the id
//! in the request extensions (read it with
//! [`CorrelationId`](crate::extractors::CorrelationId)) and echoes it on the
//! response.
//!
//! [`RequestSpan`] is the `TraceLayer` span maker. The `http_request` span it
//! opens carries the correlation id, method and URI; its `booth_id` field
//! starts empty and is filled by [`record_booth`] once a booth token has
//! been validated.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use photobooth_core::model::BoothId;
use tower_http::trace::MakeSpan;
use tracing::Span;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Correlation id carried by `headers`, if it is a UUID.
pub(crate) fn header_correlation_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Assign the request's correlation id and echo it on the response.
///
/// ```ignore
/// let app = Router::new()
///     .route("/api/vouchers", get(list_vouchers))
///     .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
///     .layer(axum::middleware::from_fn(assign_correlation_id));
/// ```
pub async fn assign_correlation_id(mut request: Request, next: Next) -> Response {
    let correlation_id =
        header_correlation_id(request.headers()).unwrap_or_else(Uuid::new_v4);
    request.extensions_mut().insert(correlation_id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

/// Opens the `http_request` span for `TraceLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        let correlation_id = request
            .extensions()
            .get::<Uuid>()
            .map(ToString::to_string)
            .unwrap_or_default();

        tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %request.method(),
            uri = %request.uri(),
            booth_id = tracing::field::Empty,
        )
    }
}

/// Attach the authenticated booth to the current request span.
pub fn record_booth(booth_id: BoothId) {
    Span::current().record("booth_id", tracing::field::display(booth_id));
}
