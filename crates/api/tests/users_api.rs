//! HTTP-level integration tests for the `/users` registry.
//!
//! Registration is public; the remaining operations sit behind the bearer
//! gate.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, login, post_json, seeded_store, send_json_auth,
    user_by_email, RecordingChannel,
};
use serde_json::json;

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";

/// Build an app with Alice registered and return it with her session token.
async fn signed_in_as_alice() -> (
    axum::Router,
    Arc<archivist_db::store::InMemoryUserStore>,
    String,
) {
    let store = seeded_store(&[ALICE]).await;
    let channel = Arc::new(RecordingChannel::default());
    let app = common::build_test_app(store.clone(), channel.clone());
    let token = login(&app, &channel, ALICE).await;
    (app, store, token)
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registering a new address returns 201 with the stored user.
#[tokio::test]
async fn test_register_user() {
    let store = seeded_store(&[]).await;
    let app = common::build_test_app(store, Arc::new(RecordingChannel::default()));

    let response = post_json(app, "/users", json!({ "email": BOB, "name": "Bob" })).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["email"], BOB);
    assert_eq!(json["data"]["name"], "Bob");
}

/// A second registration for the same address conflicts.
#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let store = seeded_store(&[ALICE]).await;
    let app = common::build_test_app(store, Arc::new(RecordingChannel::default()));

    let response = post_json(app, "/users", json!({ "email": ALICE })).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

/// Invalid addresses fail validation.
#[tokio::test]
async fn test_register_invalid_email_returns_400() {
    let store = seeded_store(&[]).await;
    let app = common::build_test_app(store, Arc::new(RecordingChannel::default()));

    let response = post_json(app, "/users", json!({ "email": "not-an-email" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

/// A freshly registered user can complete the magic-link flow.
#[tokio::test]
async fn test_registered_user_can_log_in() {
    let store = seeded_store(&[]).await;
    let channel = Arc::new(RecordingChannel::default());
    let app = common::build_test_app(store, channel.clone());

    let response = post_json(app.clone(), "/users", json!({ "email": BOB })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = login(&app, &channel, BOB).await;
    let response = get_auth(app, "/auth/profile", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email"], BOB);
}

// ---------------------------------------------------------------------------
// Gated operations
// ---------------------------------------------------------------------------

/// Listing users requires a session token.
#[tokio::test]
async fn test_list_users_requires_auth() {
    let (app, _store, token) = signed_in_as_alice().await;

    let response = get(app.clone(), "/users").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["email"], ALICE);
}

/// Fetching an unknown id is a 404.
#[tokio::test]
async fn test_get_missing_user_returns_404() {
    let (app, _store, token) = signed_in_as_alice().await;

    let response = get_auth(app, "/users/999", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

/// PATCH only changes the supplied fields.
#[tokio::test]
async fn test_update_user_name() {
    let (app, store, token) = signed_in_as_alice().await;
    let alice = user_by_email(&store, ALICE).await;

    let response = send_json_auth(
        app,
        "PATCH",
        &format!("/users/{}", alice.id),
        &token,
        json!({ "name": "Alice Liddell" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Alice Liddell");
    assert_eq!(json["data"]["email"], ALICE);
}

/// Taking over another user's address conflicts.
#[tokio::test]
async fn test_update_to_taken_email_returns_409() {
    let (app, _store, token) = signed_in_as_alice().await;

    let response = post_json(app.clone(), "/users", json!({ "email": BOB })).await;
    let bob_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = send_json_auth(
        app,
        "PATCH",
        &format!("/users/{bob_id}"),
        &token,
        json!({ "email": ALICE }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// DELETE returns 204 and the user is gone afterwards.
#[tokio::test]
async fn test_delete_user() {
    let (app, _store, token) = signed_in_as_alice().await;

    let response = post_json(app.clone(), "/users", json!({ "email": BOB })).await;
    let bob_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/users/{bob_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/users/{bob_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &format!("/users/{bob_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting yourself ends your session on the next request.
#[tokio::test]
async fn test_delete_self_revokes_session() {
    let (app, store, token) = signed_in_as_alice().await;
    let alice = user_by_email(&store, ALICE).await;

    let response = delete_auth(app.clone(), &format!("/users/{}", alice.id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/users", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
