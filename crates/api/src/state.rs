use std::sync::Arc;

use archivist_db::store::UserStore;
use archivist_delivery::DeliveryChannel;

use crate::auth::session::SessionTokenCodec;
use crate::auth::strategy::MagicLinkStrategy;
use crate::auth::AuthService;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Identity store.
    pub users: Arc<dyn UserStore>,
    /// Server configuration, immutable after startup.
    pub config: Arc<ServerConfig>,
    /// Login orchestrator and bearer-token verifier.
    pub auth: AuthService,
}

impl AppState {
    /// Wire the auth stack (codecs, magic-link strategy, orchestrator) from
    /// `config` on top of the given store and delivery channel.
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        channel: Arc<dyn DeliveryChannel>,
    ) -> Self {
        let strategy = MagicLinkStrategy::new(Arc::clone(&users), &config.magic_link, channel);
        let auth = AuthService::new(
            Arc::clone(&users),
            SessionTokenCodec::new(&config.jwt),
            Arc::new(strategy),
        );

        Self {
            users,
            config: Arc::new(config),
            auth,
        }
    }
}
