//! Generic HTTP webhook transport.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use audithub_core::config::WebhookConfig;
use audithub_core::error::AppError;
use audithub_core::AppResult;

/// Service name stamped onto every outgoing payload.
const SERVICE_NAME: &str = "audithub";

/// Delivers a JSON payload to all configured webhook URLs.
#[async_trait]
pub trait WebhookSender: Send + Sync + 'static {
    async fn send(&self, payload: &Map<String, Value>) -> AppResult<()>;
}

/// [`WebhookSender`] that POSTs JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
    urls: Vec<String>,
}

impl HttpWebhookSender {
    /// Builds the sender from webhook configuration.
    pub fn new(config: &WebhookConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            urls: config.urls.clone(),
        })
    }

    /// Returns the payload with `timestamp` and `service` stamped on.
    fn enrich(payload: &Map<String, Value>) -> Map<String, Value> {
        let mut enriched = payload.clone();
        enriched.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        enriched.insert("service".to_string(), Value::String(SERVICE_NAME.into()));
        enriched
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn send(&self, payload: &Map<String, Value>) -> AppResult<()> {
        if self.urls.is_empty() {
            return Err(AppError::configuration("No webhook URLs configured"));
        }

        let body = Value::Object(Self::enrich(payload));

        // Every URL gets its own delivery attempt; failures are collected
        // rather than short-circuiting.
        let mut failures: Vec<String> = Vec::new();
        for url in &self.urls {
            let result = self.client.post(url).json(&body).send().await;
            match result {
                Ok(response) if response.status().is_success() => {
                    debug!(url = %url, "Webhook notification sent");
                }
                Ok(response) => {
                    failures.push(format!("{url}: HTTP {}", response.status()));
                }
                Err(e) => failures.push(format!("{url}: {e}")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AppError::notification(format!(
                "Webhook delivery failed for {}",
                failures.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrich_stamps_timestamp_and_service() {
        let mut payload = Map::new();
        payload.insert("event".to_string(), Value::String("USER_DELETED".into()));

        let enriched = HttpWebhookSender::enrich(&payload);
        assert_eq!(enriched["event"], Value::String("USER_DELETED".into()));
        assert_eq!(enriched["service"], Value::String("audithub".into()));
        assert!(enriched.contains_key("timestamp"));
    }

    #[tokio::test]
    async fn no_urls_is_a_configuration_error() {
        let sender = HttpWebhookSender::new(&WebhookConfig::default()).unwrap();
        let err = sender.send(&Map::new()).await.unwrap_err();
        assert!(err.message.contains("No webhook URLs"));
    }

    #[tokio::test]
    async fn every_failing_url_is_reported() {
        let config = WebhookConfig {
            enabled: true,
            urls: vec![
                "http://127.0.0.1:1/a".to_string(),
                "http://127.0.0.1:1/b".to_string(),
            ],
            timeout_seconds: 1,
        };
        let sender = HttpWebhookSender::new(&config).unwrap();
        let err = sender.send(&Map::new()).await.unwrap_err();
        assert!(err.message.contains("/a"));
        assert!(err.message.contains("/b"));
    }
}
