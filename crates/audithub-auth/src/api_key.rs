//! Static API key validation.

use audithub_core::config::AuthConfig;
use audithub_core::error::AppError;

/// Checks presented API keys against the configured allow-list.
#[derive(Debug, Clone)]
pub struct ApiKeyValidator {
    keys: Vec<String>,
}

impl ApiKeyValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            keys: config.api_keys.clone(),
        }
    }

    /// Returns whether any keys are configured at all.
    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Validates a presented key against the allow-list.
    pub fn validate(&self, key: &str) -> Result<(), AppError> {
        if key.is_empty() {
            return Err(AppError::unauthorized("API key is empty"));
        }
        if self.keys.iter().any(|k| k == key) {
            Ok(())
        } else {
            Err(AppError::unauthorized("Invalid API key"))
        }
    }
}
