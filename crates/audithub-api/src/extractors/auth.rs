//! `AuthContext` extractor accepting a bearer JWT or a static API key.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use audithub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller context available in handlers.
///
/// Resolution order: `Authorization: Bearer <jwt>`, then the
/// `X-API-Key` header, then the `api_key` query parameter.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Caller identity: JWT subject, or `"api-key"` for key auth.
    pub subject: String,
    /// Tenant from the token claims; API keys carry no tenant.
    pub tenant_id: Option<String>,
    /// Roles from the token claims.
    pub roles: Vec<String>,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
        {
            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                ApiError(AppError::unauthorized("Invalid Authorization header format"))
            })?;
            let claims = state.jwt_decoder.decode_token(token)?;
            return Ok(AuthContext {
                subject: claims.sub,
                tenant_id: Some(claims.tenant_id),
                roles: claims.roles,
            });
        }

        let api_key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| query_param(parts.uri.query(), "api_key"));

        match api_key {
            Some(key) => {
                state.api_keys.validate(&key)?;
                Ok(AuthContext {
                    subject: "api-key".to_string(),
                    tenant_id: None,
                    roles: Vec::new(),
                })
            }
            None => Err(ApiError(AppError::unauthorized(
                "Missing authentication credentials",
            ))),
        }
    }
}

/// Pulls a single query parameter out of the raw query string.
fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}
