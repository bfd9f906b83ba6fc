//! HTTP API tests.
//!
//! Drive the full router against in-memory stores with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(clippy::too_many_lines)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use photobooth_core::environment::Clock;
use photobooth_core::model::{Booth, Branch, NewRedemption};
use photobooth_core::providers::{BoothRepository, PhotoRepository, VoucherRepository};
use photobooth_core::TokenConfig;
use photobooth_testing::env::TEST_TOKEN_SECRET;
use photobooth_testing::TestEnv;
use photobooth_web::{build_router, AppState, Repositories, CORRELATION_ID_HEADER};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

fn app(env: &TestEnv) -> Router {
    photobooth_testing::init_tracing();
    let repositories = Repositories {
        branches: env.branches.clone(),
        booths: env.booths.clone(),
        sessions: env.sessions.clone(),
        vouchers: env.vouchers.clone(),
        photos: env.photos.clone(),
        frames: env.frames.clone(),
        filters: env.filters.clone(),
        payments: env.payments.clone(),
        users: env.users.clone(),
        telemetry: env.telemetry.clone(),
    };
    build_router(AppState::new(
        repositories,
        env.clock.clone(),
        TokenConfig::new(TEST_TOKEN_SECRET),
    ))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, value)
}

async fn register(app: &Router, booth: &Booth, branch: &Branch) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/booth/register",
        None,
        Some(json!({ "booth_id": booth.id, "branch_id": branch.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_healthz() {
    let env = TestEnv::new();
    let response = app(&env)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_welcome50_end_to_end() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, branch) = send(
        &app,
        Method::POST,
        "/api/branches",
        None,
        Some(json!({ "name": "Siam Square", "location": "Bangkok" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, booth) = send(
        &app,
        Method::POST,
        "/api/booths",
        None,
        Some(json!({ "branch_id": branch["id"], "name": "Booth A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booth["type"], "physical");
    assert_eq!(booth["status"], "active");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booth/register",
        None,
        Some(json!({ "booth_id": booth["id"], "branch_id": branch["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, voucher) = send(
        &app,
        Method::POST,
        "/api/vouchers",
        None,
        Some(json!({
            "code": "WELCOME50",
            "type": "discount",
            "value": 50,
            "unit": "percent",
            "max_usage": 1
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(voucher["active"], true);
    assert_eq!(voucher["used_count"], 0);

    let (_, session_a) = send(&app, Method::POST, "/api/sessions", Some(&token), Some(json!({}))).await;
    let (_, session_b) = send(&app, Method::POST, "/api/sessions", Some(&token), Some(json!({}))).await;
    assert_eq!(session_a["booth_id"], booth["id"]);

    let (status, receipt) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token),
        Some(json!({ "code": "WELCOME50", "session_id": session_a["id"], "tel": "0812345678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{receipt}");
    assert_eq!(receipt["voucher"]["used_count"], 1);
    assert_eq!(receipt["redemption"]["session_id"], session_a["id"]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token),
        Some(json!({ "code": "WELCOME50", "session_id": session_b["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "voucher usage limit reached");

    let uri = format!("/api/vouchers/{}/redemptions", voucher["id"].as_str().unwrap());
    let (status, redemptions) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(redemptions.as_array().unwrap().len(), 1);

    let (_, by_code) = send(&app, Method::GET, "/api/vouchers/code/WELCOME50", None, None).await;
    assert_eq!(by_code["used_count"], 1);
}

#[tokio::test]
async fn test_register_requires_both_ids() {
    let env = TestEnv::new();
    let app = app(&env);
    let (_, booth) = env.seed_booth().await.unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booth/register",
        None,
        Some(json!({ "booth_id": booth.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "booth_id and branch_id required");
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_register_with_wrong_branch_is_unauthorized() {
    let env = TestEnv::new();
    let app = app(&env);
    let (_, booth) = env.seed_booth().await.unwrap();
    let (other_branch, _) = env.seed_booth().await.unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/booth/register",
        None,
        Some(json!({ "booth_id": booth.id, "branch_id": other_branch.id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(env.booths.get(booth.id).await.unwrap().token_version, 0);
}

#[tokio::test]
async fn test_register_unknown_booth_is_not_found() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, _) = env.seed_booth().await.unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/booth/register",
        None,
        Some(json!({ "booth_id": uuid::Uuid::new_v4(), "branch_id": branch.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_or_bad_tokens() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = send(&app, Method::GET, "/api/sessions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/sessions", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::POST, "/api/booth/regenerate-token", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_regenerate_revokes_previous_token() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let old_token = register(&app, &booth, &branch).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/booth/regenerate-token",
        Some(&old_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let new_token = body["token"].as_str().unwrap();
    assert_eq!(env.booths.get(booth.id).await.unwrap().token_version, 2);

    let (status, _) = send(&app, Method::GET, "/api/sessions", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, sessions) = send(&app, Method::GET, "/api/sessions", Some(new_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sessions, json!([]));
}

#[tokio::test]
async fn test_token_of_deleted_booth_is_unauthorized() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let token = register(&app, &booth, &branch).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/api/booths/{}", booth.id), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_moving_booth_invalidates_token() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let (other_branch, _) = env.seed_booth().await.unwrap();
    let token = register(&app, &booth, &branch).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/booths/{}", booth.id),
        None,
        Some(json!({ "branch_id": other_branch.id, "name": "moved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "booth token does not match current booth state");
}

#[tokio::test]
async fn test_sessions_are_scoped_to_their_booth() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch_a, booth_a) = env.seed_booth().await.unwrap();
    let (branch_b, booth_b) = env.seed_booth().await.unwrap();
    let token_a = register(&app, &booth_a, &branch_a).await;
    let token_b = register(&app, &booth_b, &branch_b).await;

    let session = env.seed_session(&booth_a).await.unwrap();
    let uri = format!("/api/sessions/{}", session.id);

    let (status, body) = send(&app, Method::GET, &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "started");

    let (status, body) = send(&app, Method::GET, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_b),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let list_uri = format!("/api/sessions?booth_id={}", booth_a.id);
    let (status, _) = send(&app, Method::GET, &list_uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/sessions",
        Some(&token_b),
        Some(json!({ "booth_id": booth_a.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_a),
        Some(json!({ "status": "success", "finished_at": 1_735_693_200 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, body) = send(&app, Method::GET, "/api/sessions?status=success", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/api/sessions", Some(&token_b), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_redeem_checks_session() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch_a, booth_a) = env.seed_booth().await.unwrap();
    let (_, booth_b) = env.seed_booth().await.unwrap();
    let token_a = register(&app, &booth_a, &branch_a).await;
    let foreign = env.seed_session(&booth_b).await.unwrap();
    let voucher = env.seed_voucher("FREEPRINT", 3).await.unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token_a),
        Some(json!({ "code": "FREEPRINT", "session_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token_a),
        Some(json!({ "code": "FREEPRINT", "session_id": foreign.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token_a),
        Some(json!({ "session_id": foreign.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "code and session_id required");

    assert_eq!(env.vouchers.get(voucher.id).await.unwrap().used_count, 0);
}

#[tokio::test]
async fn test_redeem_unknown_code_is_not_found() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let token = register(&app, &booth, &branch).await;
    let session = env.seed_session(&booth).await.unwrap();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/vouchers/redeem",
        Some(&token),
        Some(json!({ "code": "NOPE", "session_id": session.id })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_voucher_crud() {
    let env = TestEnv::new();
    let app = app(&env);

    let create = json!({ "code": "SUMMER", "type": "discount", "value": 100, "unit": "baht" });
    let (status, voucher) = send(&app, Method::POST, "/api/vouchers", None, Some(create.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(voucher["max_usage"], 1);

    let (status, _) = send(&app, Method::POST, "/api/vouchers", None, Some(create)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/vouchers/{}", voucher["id"].as_str().unwrap());
    let (status, updated) = send(&app, Method::PUT, &uri, None, Some(json!({ "active": false }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["active"], false);
    assert_eq!(updated["value"], 100.0);

    env.seed_voucher("ACTIVE", 5).await.unwrap();
    let (_, all) = send(&app, Method::GET, "/api/vouchers", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    let (_, active) = send(&app, Method::GET, "/api/vouchers?active=1", None, None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(active[0]["code"], "ACTIVE");

    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = send(&app, Method::GET, "/api/branches/not-a-uuid", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/vouchers",
        None,
        Some(json!({ "code": "NOTYPE" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = send(&app, Method::GET, "/api/booths?branch_id=nope", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_branch_crud_and_booth_filter() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    env.seed_booth().await.unwrap();

    let (status, booths) = send(
        &app,
        Method::GET,
        &format!("/api/booths?branch_id={}", branch.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booths.as_array().unwrap().len(), 1);
    assert_eq!(booths[0]["id"], json!(booth.id));

    let uri = format!("/api/branches/{}", branch.id);
    let (status, updated) = send(&app, Method::PUT, &uri, None, Some(json!({ "name": "Central" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Central");
    assert_eq!(updated["location"], Value::Null);

    let (_, branches) = send(&app, Method::GET, "/api/branches", None, None).await;
    assert_eq!(branches.as_array().unwrap().len(), 2);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/booths",
        None,
        Some(json!({ "branch_id": uuid::Uuid::new_v4(), "name": "orphan" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_photos_are_scoped_to_their_booth() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch_a, booth_a) = env.seed_booth().await.unwrap();
    let (branch_b, booth_b) = env.seed_booth().await.unwrap();
    let token_a = register(&app, &booth_a, &branch_a).await;
    let token_b = register(&app, &booth_b, &branch_b).await;
    let session = env.seed_session(&booth_a).await.unwrap();
    let frame = env.seed_frame("sakura").await.unwrap();

    let create = json!({
        "session_id": session.id,
        "frame_id": frame.id,
        "storage_url": "s3://captures/a/1.jpg"
    });
    let (status, _) = send(&app, Method::POST, "/api/media/photos", None, Some(create.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, Method::POST, "/api/media/photos", Some(&token_b), Some(create.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, photo) = send(&app, Method::POST, "/api/media/photos", Some(&token_a), Some(create)).await;
    assert_eq!(status, StatusCode::CREATED, "{photo}");
    assert_eq!(photo["frame_id"], json!(frame.id));

    let uri = format!("/api/media/photos/{}", photo["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::GET, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token_a),
        Some(json!({ "rendered_url": "s3://renders/a/1.jpg" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rendered_url"], "s3://renders/a/1.jpg");
    assert_eq!(updated["storage_url"], "s3://captures/a/1.jpg");

    let list_uri = format!("/api/media/photos?session_id={}", session.id);
    let (status, _) = send(&app, Method::GET, &list_uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let session_uri = format!("/api/sessions/{}/photos", session.id);
    let (status, photos) = send(&app, Method::GET, &session_uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(photos.as_array().unwrap().len(), 1);

    let frame_uri = format!("/api/media/frames/{}", frame.id);
    let (status, _) = send(&app, Method::DELETE, &frame_uri, None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::DELETE, &format!("/api/sessions/{}", session.id), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &frame_uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_share_links() {
    let env = TestEnv::new();
    let app = app(&env);
    let (_, booth) = env.seed_booth().await.unwrap();
    let session = env.seed_session(&booth).await.unwrap();
    let photo = env.seed_photo(&session).await.unwrap();
    let in_one_hour = env.clock.now().timestamp() + 3600;

    let (status, code) = send(
        &app,
        Method::POST,
        "/api/media/qrcodes",
        None,
        Some(json!({ "photo_id": photo.id, "hash": "k3y", "expire_at": in_one_hour })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{code}");

    let (status, resolved) = send(&app, Method::GET, "/api/media/qrcodes/k3y", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["photo_id"], json!(photo.id));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/media/qrcodes",
        None,
        Some(json!({ "photo_id": photo.id, "hash": "k3y" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/media/qrcodes",
        None,
        Some(json!({ "photo_id": photo.id, "hash": "stale", "expire_at": in_one_hour - 7200 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/media/qrcodes/{}", code["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/api/media/qrcodes/k3y", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(env.photos.get_qr_code("k3y").await.is_err());
}

#[tokio::test]
async fn test_frame_and_filter_catalogs() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, frame) = send(
        &app,
        Method::POST,
        "/api/media/frames",
        None,
        Some(json!({ "name": "Sakura", "file_url": "s3://frames/sakura.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(frame["active"], true);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/media/frames",
        None,
        Some(json!({ "name": "Retired", "file_url": "s3://frames/old.png", "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::POST, "/api/media/frames", None, Some(json!({ "name": "No file" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = send(&app, Method::GET, "/api/media/frames", None, None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    let (_, offered) = send(&app, Method::GET, "/api/media/frames?active=true", None, None).await;
    assert_eq!(offered.as_array().unwrap().len(), 1);
    assert_eq!(offered[0]["name"], "Sakura");

    let uri = format!("/api/media/frames/{}", frame["id"].as_str().unwrap());
    let (status, replaced) = send(
        &app,
        Method::PUT,
        &uri,
        None,
        Some(json!({ "name": "Sakura 2", "file_url": "s3://frames/sakura2.png", "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["active"], false);
    assert_eq!(replaced["created_at"], frame["created_at"]);

    let (status, filter) = send(
        &app,
        Method::POST,
        "/api/media/filters",
        None,
        Some(json!({ "name": "Mono", "effect": { "saturation": 0 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let filter_uri = format!("/api/media/filters/{}", filter["id"].as_str().unwrap());
    let (_, fetched) = send(&app, Method::GET, &filter_uri, None, None).await;
    assert_eq!(fetched["effect"]["saturation"], 0);
    let (status, _) = send(&app, Method::DELETE, &filter_uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &filter_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_payment() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch_a, booth_a) = env.seed_booth().await.unwrap();
    let (branch_b, booth_b) = env.seed_booth().await.unwrap();
    let token_a = register(&app, &booth_a, &branch_a).await;
    let token_b = register(&app, &booth_b, &branch_b).await;
    let session = env.seed_session(&booth_a).await.unwrap();

    let session_uri = format!("/api/sessions/{}/payment", session.id);
    let (status, _) = send(&app, Method::GET, &session_uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let create = json!({ "session_id": session.id, "method": "qr", "amount": 150 });
    let (status, payment) = send(&app, Method::POST, "/api/payments", None, Some(create.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    assert_eq!(payment["currency"], "THB");
    assert_eq!(payment["status"], "pending");

    let (status, _) = send(&app, Method::POST, "/api/payments", None, Some(create)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/api/payments/{}", payment["id"].as_str().unwrap());
    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        None,
        Some(json!({ "status": "success", "transaction_ref": "PP-42" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "success");

    let (status, by_session) = send(
        &app,
        Method::GET,
        &format!("/api/payments/session/{}", session.id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_session["transaction_ref"], "PP-42");

    let (status, _) = send(&app, Method::GET, &session_uri, Some(&token_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&app, Method::GET, &session_uri, Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], payment["id"]);

    let (_, session) = send(&app, Method::GET, &format!("/api/sessions/{}", session.id), Some(&token_a), None).await;
    assert_eq!(session["payment_id"], payment["id"]);
}

#[tokio::test]
async fn test_user_points() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, user) = send(
        &app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "tel": "0812345678", "email": "mali@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["role"], "customer");
    assert_eq!(user["points"], 0);

    let (_, found) = send(&app, Method::GET, "/api/users?email=mali@example.com", None, None).await;
    assert_eq!(found[0]["id"], user["id"]);

    let uri = format!("/api/users/{}", user["id"].as_str().unwrap());
    let points_uri = format!("{uri}/points");
    let (status, body) = send(&app, Method::POST, &points_uri, None, Some(json!({ "delta": 30 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 30);

    let (status, body) = send(&app, Method::POST, &points_uri, None, Some(json!({ "delta": -40 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::PUT, &uri, None, Some(json!({ "points": 999, "role": "staff" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "staff");
    assert_eq!(body["points"], 30);

    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booth_logs_and_analytics() {
    let env = TestEnv::new();
    let app = app(&env);
    let (_, booth) = env.seed_booth().await.unwrap();
    let (_, other) = env.seed_booth().await.unwrap();
    let foreign = env.seed_session(&other).await.unwrap();

    let logs_uri = format!("/api/booths/{}/logs", booth.id);
    for (event_type, level) in [("boot", "info"), ("printer_jam", "ERROR"), ("paper_low", "notice")] {
        let (status, entry) = send(
            &app,
            Method::POST,
            &logs_uri,
            None,
            Some(json!({ "event_type": event_type, "level": level })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["booth_id"], json!(booth.id));
    }

    let (status, logs) = send(&app, Method::GET, &format!("{logs_uri}?limit=2"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 2);
    let (_, logs) = send(&app, Method::GET, &logs_uri, None, None).await;
    assert_eq!(logs.as_array().unwrap().len(), 3);

    let events_uri = format!("/api/booths/{}/analytics", booth.id);
    let (status, _) = send(
        &app,
        Method::POST,
        &events_uri,
        None,
        Some(json!({ "event_name": "frame_selected", "session_id": foreign.id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, event) = send(
        &app,
        Method::POST,
        &events_uri,
        None,
        Some(json!({ "event_name": "idle", "payload": { "seconds": 90 } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, events) = send(&app, Method::GET, &events_uri, None, None).await;
    assert_eq!(events, json!([event]));

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/booths/{}/logs", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_branch_with_booths_cannot_be_deleted() {
    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let branch_uri = format!("/api/branches/{}", branch.id);

    let (status, body) = send(&app, Method::DELETE, &branch_uri, None, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = send(&app, Method::DELETE, &format!("/api/booths/{}", booth.id), None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &branch_uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_max_usage_cannot_drop_below_used_count() {
    let env = TestEnv::new();
    let app = app(&env);
    let (_, booth) = env.seed_booth().await.unwrap();
    let voucher = env.seed_voucher("TRIO", 3).await.unwrap();
    for _ in 0..2 {
        let session = env.seed_session(&booth).await.unwrap();
        env.ledger
            .redeem(
                "TRIO",
                NewRedemption {
                    session_id: session.id,
                    tel: None,
                    discount: None,
                },
            )
            .await
            .unwrap();
    }

    let uri = format!("/api/vouchers/{}", voucher.id);
    let (status, body) = send(&app, Method::PUT, &uri, None, Some(json!({ "max_usage": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(env.vouchers.get(voucher.id).await.unwrap().max_usage, 3);

    let (status, body) = send(&app, Method::PUT, &uri, None, Some(json!({ "max_usage": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_usage"], 2);
}

/// Collects every value recorded into a span's `booth_id` field.
#[derive(Clone, Default)]
struct BoothIdRecorder(Arc<Mutex<Vec<String>>>);

struct BoothIdField(Option<String>);

impl Visit for BoothIdField {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "booth_id" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for BoothIdRecorder {
    fn on_record(&self, _id: &tracing::span::Id, values: &tracing::span::Record<'_>, _ctx: Context<'_, S>) {
        let mut field = BoothIdField(None);
        values.record(&mut field);
        if let Some(value) = field.0 {
            self.0.lock().unwrap().push(value);
        }
    }
}

#[tokio::test]
async fn test_request_span_records_authenticated_booth() {
    let recorder = BoothIdRecorder::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder.clone()));

    let env = TestEnv::new();
    let app = app(&env);
    let (branch, booth) = env.seed_booth().await.unwrap();
    let token = register(&app, &booth, &branch).await;

    send(&app, Method::GET, "/api/branches", None, None).await;
    assert!(recorder.0.lock().unwrap().is_empty());

    let (status, _) = send(&app, Method::GET, "/api/sessions", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*recorder.0.lock().unwrap(), vec![booth.id.to_string()]);
}
