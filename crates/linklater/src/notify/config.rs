//! Configuration for the notification mailer.

use anyhow::{Context, Result};

/// Default SMTP relay host.
pub const DEFAULT_SMTP_HOST: &str = "localhost";

/// Default SMTP port (plain relay).
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// SMTP settings for draft notifications.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port.
    pub smtp_port: u16,
    /// SMTP credentials; without them the relay is used unauthenticated.
    pub credentials: Option<(String, String)>,
    /// Sender address.
    pub from_email: String,
    /// Recipient address.
    pub to_email: String,
}

impl MailConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `LINKLATER_FROM_EMAIL`: sender address
    /// - `LINKLATER_TO_EMAIL`: recipient address
    ///
    /// # Optional Environment Variables
    /// - `LINKLATER_SMTP_HOST`: relay host (default: localhost)
    /// - `LINKLATER_SMTP_PORT`: relay port (default: 25)
    /// - `LINKLATER_SMTP_USERNAME` / `LINKLATER_SMTP_PASSWORD`: enable STARTTLS auth
    pub fn from_env() -> Result<Self> {
        let from_email = std::env::var("LINKLATER_FROM_EMAIL")
            .context("LINKLATER_FROM_EMAIL environment variable not set")?;

        let to_email = std::env::var("LINKLATER_TO_EMAIL")
            .context("LINKLATER_TO_EMAIL environment variable not set")?;

        let smtp_host =
            std::env::var("LINKLATER_SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());

        let smtp_port = std::env::var("LINKLATER_SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        let credentials = match (
            std::env::var("LINKLATER_SMTP_USERNAME"),
            std::env::var("LINKLATER_SMTP_PASSWORD"),
        ) {
            (Ok(user), Ok(pass)) if !user.is_empty() => Some((user, pass)),
            _ => None,
        };

        Ok(Self {
            smtp_host,
            smtp_port,
            credentials,
            from_email,
            to_email,
        })
    }

    /// Whether the mailer authenticates over STARTTLS.
    #[must_use]
    pub fn uses_auth(&self) -> bool {
        self.credentials.is_some()
    }
}
