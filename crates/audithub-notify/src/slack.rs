//! Slack incoming-webhook transport.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use audithub_core::config::SlackConfig;
use audithub_core::error::AppError;
use audithub_core::AppResult;

/// Channel used when no channel is configured.
const DEFAULT_CHANNEL: &str = "#audit-alerts";

/// Posts a text message to a Slack channel.
#[async_trait]
pub trait SlackSender: Send + Sync + 'static {
    async fn send(&self, text: &str) -> AppResult<()>;
}

/// [`SlackSender`] backed by a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhookSender {
    client: reqwest::Client,
    webhook_url: String,
    channel: String,
    username: String,
}

impl SlackWebhookSender {
    /// Builds the sender from Slack configuration.
    pub fn new(config: &SlackConfig, timeout_seconds: u64) -> Result<Self, AppError> {
        if config.webhook_url.is_empty() {
            return Err(AppError::configuration("Slack webhook URL is not set"));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        let channel = if config.channel.is_empty() {
            DEFAULT_CHANNEL.to_string()
        } else {
            config.channel.clone()
        };

        Ok(Self {
            client,
            webhook_url: config.webhook_url.clone(),
            channel,
            username: config.username.clone(),
        })
    }
}

#[async_trait]
impl SlackSender for SlackWebhookSender {
    async fn send(&self, text: &str) -> AppResult<()> {
        let payload = json!({
            "channel": self.channel,
            "username": self.username,
            "text": text,
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notification(format!("Slack POST failed: {e}")))?;

        if response.status().is_success() {
            debug!(channel = %self.channel, "Slack notification sent");
            Ok(())
        } else {
            Err(AppError::notification(format!(
                "Slack returned HTTP {}",
                response.status()
            )))
        }
    }
}
