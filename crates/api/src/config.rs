use archivist_delivery::EmailConfig;

use crate::auth::link::MagicLinkConfig;
use crate::auth::session::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Loaded once at startup and shared read-only through `Arc`. All non-secret
/// fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Session token configuration (secret, lifetime).
    pub jwt: JwtConfig,
    /// Magic-link configuration (separate secret, lifetime, callback URL).
    pub magic_link: MagicLinkConfig,
    /// SMTP settings; `None` means links are logged instead of mailed.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// Token and SMTP variables are documented on [`JwtConfig::from_env`],
    /// [`MagicLinkConfig::from_env`] and [`EmailConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let magic_link = MagicLinkConfig::from_env();
        if jwt.secret == magic_link.secret {
            tracing::warn!("JWT_SECRET and MAGIC_LINK_SECRET are identical; use separate secrets");
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            magic_link,
            email: EmailConfig::from_env(),
        }
    }
}
