//! Notification channel configuration.

use serde::{Deserialize, Serialize};

/// Configuration for all three notification channels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Email channel settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Slack channel settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Generic webhook channel settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Email (SMTP) notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Whether the email channel is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// SMTP relay host.
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub username: String,
    /// SMTP password.
    #[serde(default)]
    pub password: String,
    /// Sender address.
    #[serde(default)]
    pub from: String,
    /// Recipient addresses.
    #[serde(default)]
    pub to: Vec<String>,
}

/// Slack notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Whether the Slack channel is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Slack incoming-webhook URL.
    #[serde(default)]
    pub webhook_url: String,
    /// Target channel; `#audit-alerts` when empty.
    #[serde(default)]
    pub channel: String,
    /// Bot username shown on messages.
    #[serde(default)]
    pub username: String,
}

/// Generic webhook notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Whether the webhook channel is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Destination URLs; each receives the payload independently.
    #[serde(default)]
    pub urls: Vec<String>,
    /// Per-request send timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_timeout() -> u64 {
    30
}
