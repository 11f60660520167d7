//! SMTP email transport.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use audithub_core::config::EmailConfig;
use audithub_core::error::AppError;
use audithub_core::AppResult;

/// Sends a plain-text message to all configured recipients.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send(&self, subject: &str, body: &str) -> AppResult<()>;
}

/// [`EmailSender`] backed by an async SMTP transport.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    to: Vec<String>,
}

impl std::fmt::Debug for SmtpEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpEmailSender")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl SmtpEmailSender {
    /// Builds the transport from email configuration.
    pub fn new(config: &EmailConfig) -> Result<Self, AppError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| {
                AppError::configuration(format!("Invalid SMTP relay {}: {e}", config.smtp_host))
            })?
            .port(config.smtp_port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
            to: config.to.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, subject: &str, body: &str) -> AppResult<()> {
        if self.to.is_empty() {
            return Err(AppError::configuration("No email recipients configured"));
        }

        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::configuration(format!("Invalid from address: {e}")))?;

        // Each recipient is delivered independently; one bad mailbox must
        // not block the rest.
        let mut failures: Vec<String> = Vec::new();
        for recipient in &self.to {
            let result = async {
                let to = recipient.parse().map_err(|e| {
                    AppError::notification(format!("Invalid recipient {recipient}: {e}"))
                })?;
                let message = Message::builder()
                    .from(from.clone())
                    .to(to)
                    .subject(subject)
                    .header(ContentType::TEXT_PLAIN)
                    .body(body.to_string())
                    .map_err(|e| AppError::notification(format!("Failed to build email: {e}")))?;

                self.transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::notification(format!("SMTP send failed: {e}")))?;
                Ok::<(), AppError>(())
            }
            .await;

            match result {
                Ok(()) => debug!(recipient = %recipient, "Email notification sent"),
                Err(e) => failures.push(format!("{recipient}: {}", e.message)),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::notification(format!(
                "Email delivery failed for {}",
                failures.join("; ")
            )))
        }
    }
}
