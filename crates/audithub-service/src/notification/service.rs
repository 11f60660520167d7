//! Concurrent notification dispatch.

use std::sync::Arc;

use tracing::error;

use audithub_core::config::NotificationConfig;
use audithub_core::error::AppError;
use audithub_core::AppResult;
use audithub_entity::audit::AuditEvent;
use audithub_notify::{EmailSender, SlackSender, WebhookSender};

use super::{format, rules};

/// Fans an audit event out to the eligible channels.
///
/// Eligible channels run concurrently; a failing channel never blocks
/// the others, and every failure is reported in the aggregate error.
#[derive(Clone)]
pub struct NotificationService {
    config: NotificationConfig,
    email: Option<Arc<dyn EmailSender>>,
    slack: Option<Arc<dyn SlackSender>>,
    webhook: Option<Arc<dyn WebhookSender>>,
}

impl NotificationService {
    /// Creates a new dispatcher. A `None` sender for an enabled channel
    /// surfaces as a per-channel failure at dispatch time.
    pub fn new(
        config: NotificationConfig,
        email: Option<Arc<dyn EmailSender>>,
        slack: Option<Arc<dyn SlackSender>>,
        webhook: Option<Arc<dyn WebhookSender>>,
    ) -> Self {
        Self {
            config,
            email,
            slack,
            webhook,
        }
    }

    /// Whether any channel would accept this event.
    pub fn should_dispatch(&self, event: &AuditEvent) -> bool {
        (self.config.email.enabled && rules::requires_email(&event.event))
            || (self.config.slack.enabled && rules::requires_slack(&event.environment))
            || (self.config.webhook.enabled && rules::requires_webhook())
    }

    /// Delivers the event to all eligible channels concurrently.
    ///
    /// Returns `Ok(())` when no channel is eligible or every eligible
    /// channel succeeded; otherwise an aggregate error naming each
    /// failed channel.
    pub async fn dispatch(&self, event: &AuditEvent) -> AppResult<()> {
        if !self.should_dispatch(event) {
            return Ok(());
        }

        let mut tasks = Vec::new();

        if self.config.email.enabled && rules::requires_email(&event.event) {
            let sender = self.email.clone();
            let subject = format::email_subject(event);
            let body = format::email_body(event);
            tasks.push(tokio::spawn(async move {
                match sender {
                    Some(sender) => sender
                        .send(&subject, &body)
                        .await
                        .map_err(|e| format!("email notification failed: {}", e.message)),
                    None => Err("email notification failed: sender not configured".to_string()),
                }
            }));
        }

        if self.config.slack.enabled && rules::requires_slack(&event.environment) {
            let sender = self.slack.clone();
            let text = format::slack_text(event);
            tasks.push(tokio::spawn(async move {
                match sender {
                    Some(sender) => sender
                        .send(&text)
                        .await
                        .map_err(|e| format!("slack notification failed: {}", e.message)),
                    None => Err("slack notification failed: sender not configured".to_string()),
                }
            }));
        }

        if self.config.webhook.enabled && rules::requires_webhook() {
            let sender = self.webhook.clone();
            let payload = format::webhook_payload(event);
            tasks.push(tokio::spawn(async move {
                match sender {
                    Some(sender) => sender
                        .send(&payload)
                        .await
                        .map_err(|e| format!("webhook notification failed: {}", e.message)),
                    None => Err("webhook notification failed: sender not configured".to_string()),
                }
            }));
        }

        let mut failures: Vec<String> = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(message)) => {
                    error!(audit_event_id = %event.id, %message, "Notification failed");
                    failures.push(message);
                }
                Err(e) => {
                    let message = format!("notification task panicked: {e}");
                    error!(audit_event_id = %event.id, %message, "Notification failed");
                    failures.push(message);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::notification(format!(
                "notification errors: {}",
                failures.join("; ")
            )))
        }
    }
}
