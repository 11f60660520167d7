//! Status vocabulary configuration.

use serde::{Deserialize, Serialize};

/// Configured vocabulary of permitted audit event status values.
///
/// When `enabled` is false, status validation is bypassed entirely and any
/// non-empty status string is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Whether status vocabulary validation is enforced.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Status assigned to new events when the caller omits one.
    #[serde(default = "default_status")]
    pub default_status: String,
    /// The permitted status values.
    #[serde(default = "default_status_values")]
    pub status_values: Vec<String>,
    /// The status value counted as an error in statistics.
    #[serde(default = "default_error_status")]
    pub error_status: String,
}

impl AuditConfig {
    /// Checks whether the given status is valid according to configuration.
    pub fn is_valid_status(&self, status: &str) -> bool {
        if !self.enabled {
            return true;
        }
        self.status_values.iter().any(|s| s == status)
    }

    /// Returns the permitted values joined for error messages.
    pub fn permitted_values(&self) -> String {
        self.status_values.join(", ")
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            default_status: default_status(),
            status_values: default_status_values(),
            error_status: default_error_status(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_status() -> String {
    "pending".to_string()
}

fn default_status_values() -> Vec<String> {
    ["pending", "processing", "completed", "failed", "archived"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_error_status() -> String {
    "failed".to_string()
}
