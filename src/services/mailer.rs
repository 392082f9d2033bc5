//! SMTP fan-out for the bulk-email relay.
//!
//! Delivery is best-effort: a failed send to one recipient is logged and the
//! fan-out continues. Nothing here retries.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::utils::error::AppError;

/// Outcome of a bulk send.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BulkSendReport {
    pub attempted: usize,
    pub sent: usize,
}

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl Mailer {
    /// Build the mailer from configuration. Without `SMTP_URL` the mailer
    /// comes up disabled and bulk sends are rejected with a service error.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let from: Mailbox = config
            .mail_from
            .parse()
            .map_err(|e| AppError::InternalServerError(format!("invalid MAIL_FROM address: {e}")))?;

        let transport = match &config.smtp_url {
            Some(url) => {
                let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)
                    .map_err(|e| {
                        AppError::InternalServerError(format!("invalid SMTP_URL: {e}"))
                    })?
                    .build();
                Some(transport)
            }
            None => {
                tracing::warn!("SMTP_URL not set, bulk email delivery is disabled");
                None
            }
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send one HTML message per recipient. Per-recipient failures (bad
    /// address, transport error) are logged and skipped.
    pub async fn send_bulk(
        &self,
        recipients: &[String],
        subject: &str,
        html_content: &str,
    ) -> Result<BulkSendReport, AppError> {
        let transport = self.transport.as_ref().ok_or_else(|| {
            AppError::ExternalServiceError("Email delivery is not configured".to_string())
        })?;

        let mut sent = 0usize;
        for recipient in recipients {
            let mailbox: Mailbox = match recipient.parse() {
                Ok(mb) => mb,
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Skipping invalid email address");
                    continue;
                }
            };

            let message = Message::builder()
                .from(self.from.clone())
                .to(mailbox)
                .subject(subject)
                .header(ContentType::TEXT_HTML)
                .body(html_content.to_string());

            let message = match message {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Failed to build message");
                    continue;
                }
            };

            match transport.send(message).await {
                Ok(_) => sent += 1,
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Failed to send email");
                }
            }
        }

        Ok(BulkSendReport {
            attempted: recipients.len(),
            sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_smtp() -> Config {
        Config {
            database_url: "postgres://localhost/ticketflow".to_string(),
            port: 3001,
            session_ttl_hours: 24,
            smtp_url: None,
            mail_from: "TicketFlow <tickets@ticketflow.local>".to_string(),
        }
    }

    #[test]
    fn mailer_without_smtp_url_is_disabled() {
        let mailer = Mailer::from_config(&config_without_smtp()).unwrap();
        assert!(!mailer.is_enabled());
    }

    #[test]
    fn bad_from_address_is_rejected() {
        let mut config = config_without_smtp();
        config.mail_from = "not an address".to_string();
        assert!(Mailer::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn disabled_mailer_rejects_bulk_send() {
        let mailer = Mailer::from_config(&config_without_smtp()).unwrap();
        let result = mailer
            .send_bulk(&["someone@example.com".to_string()], "Hi", "<p>Hi</p>")
            .await;
        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
    }
}
