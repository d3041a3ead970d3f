#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use archivist_api::auth::link::MagicLinkConfig;
use archivist_api::auth::session::JwtConfig;
use archivist_api::config::ServerConfig;
use archivist_api::router::build_app_router;
use archivist_api::state::AppState;
use archivist_db::models::user::{CreateUser, User};
use archivist_db::store::{InMemoryUserStore, UserStore};
use archivist_delivery::{DeliveryChannel, DeliveryError, LinkMessage};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with fixed secrets and no SMTP.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-session-secret".into(),
            expires_in: chrono::Duration::hours(1),
            leeway_secs: 0,
        },
        magic_link: MagicLinkConfig {
            secret: "integration-link-secret".into(),
            expires_in: chrono::Duration::minutes(5),
            callback_url: "http://localhost:3000/auth/login/callback".into(),
            leeway_secs: 0,
        },
        email: None,
    }
}

/// Build the full application router on top of the given store and channel,
/// with the same middleware stack production uses.
pub fn build_test_app(users: Arc<dyn UserStore>, channel: Arc<dyn DeliveryChannel>) -> Router {
    build_app_router(AppState::new(test_config(), users, channel))
}

/// In-memory store with one user per address.
pub async fn seeded_store(emails: &[&str]) -> Arc<InMemoryUserStore> {
    let store = InMemoryUserStore::new();
    for email in emails {
        store
            .create(&CreateUser {
                email: email.to_string(),
                name: String::new(),
            })
            .await
            .expect("seeding should succeed");
    }
    Arc::new(store)
}

/// Fetch a user straight from the store.
pub async fn user_by_email(store: &InMemoryUserStore, email: &str) -> User {
    store
        .find_by_email(email)
        .await
        .expect("user should exist")
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// Channel that keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<LinkMessage>>,
}

impl RecordingChannel {
    pub fn messages(&self) -> Vec<LinkMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// The `token` query value of the most recent link.
    pub fn last_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let link = &sent.last()?.link;
        link.split_once("token=").map(|(_, token)| token.to_string())
    }
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn deliver(&self, message: &LinkMessage) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Channel whose every delivery attempt fails.
pub struct FailingChannel;

#[async_trait]
impl DeliveryChannel for FailingChannel {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn deliver(&self, _message: &LinkMessage) -> Result<(), DeliveryError> {
        Err(DeliveryError::Channel("relay unavailable".into()))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    get_with_authorization(app, uri, &format!("Bearer {token}")).await
}

/// GET with a raw `Authorization` header value.
pub async fn get_with_authorization(app: Router, uri: &str, value: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", value)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

/// POST an arbitrary string as `application/json`.
pub async fn post_raw(app: Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json_auth(
    app: Router,
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Run the full magic-link flow for `email` and return the session token.
pub async fn login(app: &Router, channel: &RecordingChannel, email: &str) -> String {
    let response = post_json(
        app.clone(),
        "/auth/login",
        serde_json::json!({ "destination": email }),
    )
    .await;
    assert_eq!(response.status(), 200);

    let link_token = channel.last_token().expect("a link should have been sent");
    let response = get(app.clone(), &format!("/auth/login/callback?token={link_token}")).await;
    assert_eq!(response.status(), 200);

    body_json(response).await["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string()
}
