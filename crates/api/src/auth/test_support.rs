//! Fixtures shared by the auth unit tests.

use std::sync::{Arc, Mutex};

use archivist_core::types::DbId;
use archivist_db::models::user::{CreateUser, UpdateUser, User};
use archivist_db::store::{InMemoryUserStore, StoreError, UserStore};
use archivist_delivery::{DeliveryChannel, DeliveryError, LinkMessage};
use async_trait::async_trait;
use chrono::Duration;

use super::link::MagicLinkConfig;
use super::session::JwtConfig;

pub fn session_config() -> JwtConfig {
    JwtConfig {
        secret: "unit-session-secret".into(),
        expires_in: Duration::hours(1),
        leeway_secs: 0,
    }
}

pub fn link_config() -> MagicLinkConfig {
    MagicLinkConfig {
        secret: "unit-link-secret".into(),
        expires_in: Duration::minutes(5),
        callback_url: "http://localhost:3000/auth/login/callback".into(),
        leeway_secs: 0,
    }
}

/// In-memory store pre-populated with one user per address.
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

/// Store whose backing database is unreachable.
pub struct BrokenStore;

fn unreachable_db<T>() -> Result<T, StoreError> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl UserStore for BrokenStore {
    async fn create(&self, _input: &CreateUser) -> Result<User, StoreError> {
        unreachable_db()
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        unreachable_db()
    }

    async fn find_by_id(&self, _id: DbId) -> Result<User, StoreError> {
        unreachable_db()
    }

    async fn find_by_email(&self, _email: &str) -> Result<User, StoreError> {
        unreachable_db()
    }

    async fn update(&self, _id: DbId, _input: &UpdateUser) -> Result<User, StoreError> {
        unreachable_db()
    }

    async fn remove(&self, _id: DbId) -> Result<(), StoreError> {
        unreachable_db()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        unreachable_db()
    }
}
