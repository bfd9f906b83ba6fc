//! Router configuration.

use crate::handlers::{
    booth_tokens, booths, branches, health_check, media, payments, sessions, users, vouchers,
};
use crate::middleware::{assign_correlation_id, RequestSpan};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// `/healthz` is served at the root; everything else lives under `/api`.
/// Every request is assigned a correlation id first, then logged by
/// `TraceLayer` inside the [`RequestSpan`] span.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Booth tokens
        .route("/booth/register", post(booth_tokens::register))
        .route("/booth/regenerate-token", post(booth_tokens::regenerate))
        // Branches
        .route(
            "/branches",
            get(branches::list_branches).post(branches::create_branch),
        )
        .route(
            "/branches/:id",
            get(branches::get_branch)
                .put(branches::update_branch)
                .delete(branches::delete_branch),
        )
        // Booths
        .route("/booths", get(booths::list_booths).post(booths::create_booth))
        .route(
            "/booths/:id",
            get(booths::get_booth)
                .put(booths::update_booth)
                .delete(booths::delete_booth),
        )
        .route(
            "/booths/:id/logs",
            get(booths::list_logs).post(booths::record_log),
        )
        .route(
            "/booths/:id/analytics",
            get(booths::list_events).post(booths::record_event),
        )
        // Sessions (booth auth)
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/sessions/:id",
            get(sessions::get_session)
                .put(sessions::update_session)
                .delete(sessions::delete_session),
        )
        .route("/sessions/:id/photos", get(sessions::list_session_photos))
        .route("/sessions/:id/payment", get(sessions::get_session_payment))
        // Photos (booth auth)
        .route(
            "/media/photos",
            get(media::list_photos).post(media::create_photo),
        )
        .route(
            "/media/photos/:id",
            get(media::get_photo)
                .put(media::update_photo)
                .delete(media::delete_photo),
        )
        // Catalogs and share links
        .route(
            "/media/frames",
            get(media::list_frames).post(media::create_frame),
        )
        .route(
            "/media/frames/:id",
            get(media::get_frame)
                .put(media::update_frame)
                .delete(media::delete_frame),
        )
        .route(
            "/media/filters",
            get(media::list_filters).post(media::create_filter),
        )
        .route(
            "/media/filters/:id",
            get(media::get_filter)
                .put(media::update_filter)
                .delete(media::delete_filter),
        )
        .route("/media/qrcodes", post(media::create_qr_code))
        // GET takes the share hash, DELETE the link id.
        .route(
            "/media/qrcodes/:key",
            get(media::get_qr_code).delete(media::delete_qr_code),
        )
        // Payments
        .route("/payments", post(payments::create_payment))
        .route(
            "/payments/session/:session_id",
            get(payments::get_session_payment),
        )
        .route(
            "/payments/:id",
            get(payments::get_payment).put(payments::update_payment),
        )
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/points", post(users::adjust_points))
        // Vouchers
        .route(
            "/vouchers",
            get(vouchers::list_vouchers).post(vouchers::create_voucher),
        )
        .route("/vouchers/redeem", post(vouchers::redeem_voucher))
        .route("/vouchers/code/:code", get(vouchers::get_voucher_by_code))
        .route(
            "/vouchers/:id",
            get(vouchers::get_voucher)
                .put(vouchers::update_voucher)
                .delete(vouchers::delete_voucher),
        )
        .route("/vouchers/:id/redemptions", get(vouchers::list_redemptions));

    Router::new()
        .route("/healthz", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(axum::middleware::from_fn(assign_correlation_id))
        .with_state(state)
}
