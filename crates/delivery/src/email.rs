//! Magic-link delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send plain-text
//! sign-in emails. Configuration is loaded from environment variables; if
//! `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! mailer should be constructed.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::channel::{DeliveryChannel, DeliveryError, LinkMessage};

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@archivist.local";

/// Subject line of every sign-in email.
const SUBJECT: &str = "[Archivist] Your sign-in link";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | --                         |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@archivist.local`  |
    /// | `SMTP_USER`     | no       | --                         |
    /// | `SMTP_PASSWORD` | no       | --                         |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Message composition
// ---------------------------------------------------------------------------

/// Render a validity window as "N minutes" / "N seconds".
fn describe_expiry(expires_in: Duration) -> String {
    let secs = expires_in.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}

/// Build the sign-in email for `message`, sent from `from_address`.
pub fn compose(from_address: &str, message: &LinkMessage) -> Result<Message, DeliveryError> {
    let body = format!(
        "Use the link below to sign in to Archivist.\n\n{}\n\n\
         The link expires in {}.\n\
         If you did not request it, you can ignore this email.\n",
        message.link,
        describe_expiry(message.expires_in)
    );

    Message::builder()
        .from(from_address.parse()?)
        .to(message.destination.parse()?)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| DeliveryError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends sign-in emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    ///
    /// The transport is built once; no connection is opened until the first
    /// delivery.
    pub fn new(config: EmailConfig) -> Result<Self, DeliveryError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            mailer: transport_builder.build(),
            config,
        })
    }
}

#[async_trait]
impl DeliveryChannel for EmailDelivery {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, message: &LinkMessage) -> Result<(), DeliveryError> {
        let email = compose(&self.config.from_address, message)?;
        self.mailer.send(email).await?;

        tracing::info!(to = %message.destination, "Sign-in email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> LinkMessage {
        LinkMessage {
            destination: "john@x.com".to_string(),
            link: "https://a.io/cb?token=t0k".to_string(),
            expires_in: Duration::from_secs(300),
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn compose_includes_link_and_expiry() {
        let email = compose(DEFAULT_FROM_ADDRESS, &sample_message()).expect("compose");
        let raw = String::from_utf8(email.formatted()).expect("ascii message");

        assert!(raw.contains("To: john@x.com"));
        assert!(raw.contains(SUBJECT));
        assert!(raw.contains("https://a.io/cb?token=t0k"));
        assert!(raw.contains("expires in 5 minutes"));
    }

    #[test]
    fn compose_rejects_bad_recipient() {
        let mut message = sample_message();
        message.destination = "not-an-email".to_string();
        let err = compose(DEFAULT_FROM_ADDRESS, &message).unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn describe_expiry_units() {
        assert_eq!(describe_expiry(Duration::from_secs(60)), "1 minute");
        assert_eq!(describe_expiry(Duration::from_secs(3600)), "60 minutes");
        assert_eq!(describe_expiry(Duration::from_secs(90)), "90 seconds");
    }
}
