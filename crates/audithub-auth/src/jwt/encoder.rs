//! JWT token issuance.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use audithub_core::config::AuthConfig;
use audithub_core::error::AppError;

use super::claims::Claims;

/// Issues signed bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    expiration_seconds: u64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiration_seconds: config.jwt_expiration_seconds,
        }
    }

    /// Signs a token for the given subject and tenant.
    pub fn encode(
        &self,
        user_id: &str,
        tenant_id: &str,
        roles: Vec<String>,
    ) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            roles,
            iat: now,
            exp: now + self.expiration_seconds as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }
}
