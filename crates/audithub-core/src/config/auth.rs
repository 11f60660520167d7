//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Credential validation configuration.
///
/// Requests may authenticate with either a bearer JWT signed with
/// `jwt_secret` or a static API key from the `api_keys` allow-list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT verification (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// JWT expiration in seconds, used when issuing test tokens.
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_seconds: u64,
    /// Static API keys accepted in place of a bearer token.
    #[serde(default)]
    pub api_keys: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiration_seconds: default_jwt_expiration(),
            api_keys: Vec::new(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_jwt_expiration() -> u64 {
    3600
}
