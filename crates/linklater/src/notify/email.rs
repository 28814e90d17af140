//! Email sender for draft notifications.

use anyhow::{Context, Result};
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::config::MailConfig;

/// Sends multipart notification emails over SMTP.
pub struct EmailSender {
    config: MailConfig,
}

impl EmailSender {
    /// Create a new email sender with the given configuration.
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(MailConfig::from_env()?))
    }

    /// Build a multipart message with plain-text and HTML alternatives.
    pub fn build_message(&self, subject: &str, html_body: &str, text_body: &str) -> Result<Message> {
        let from: Mailbox = self
            .config
            .from_email
            .parse()
            .context("Invalid from email address")?;

        let to: Mailbox = self
            .config
            .to_email
            .parse()
            .context("Invalid to email address")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .context("Failed to build email message")
    }

    /// Send an email with HTML and plain-text content.
    pub async fn send(&self, subject: &str, html_body: &str, text_body: &str) -> Result<()> {
        let email = self.build_message(subject, html_body, text_body)?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> = match &self.config.credentials {
            Some((username, password)) => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                    .context("Failed to create SMTP transport")?
                    .port(self.config.smtp_port)
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build()
            }
            None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build(),
        };

        mailer
            .send(email)
            .await
            .context("Failed to send email via SMTP")?;

        tracing::info!(
            to = %self.config.to_email,
            subject = subject,
            "Email sent successfully"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(from: &str) -> MailConfig {
        MailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            credentials: None,
            from_email: from.to_string(),
            to_email: "team@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let sender = EmailSender::new(config("Desk <desk@example.com>"));
        let message = sender
            .build_message("Linklater draft", "<p>hi</p>", "hi")
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Linklater draft"));
        assert!(raw.contains("To: team@example.com"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_invalid_from_address() {
        let sender = EmailSender::new(config("not an address"));
        assert!(sender.build_message("s", "h", "t").is_err());
    }
}
