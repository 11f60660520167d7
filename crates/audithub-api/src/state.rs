//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use audithub_auth::api_key::ApiKeyValidator;
use audithub_auth::jwt::decoder::JwtDecoder;
use audithub_core::config::AppConfig;
use audithub_service::audit::service::AuditService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, used directly by the health probes.
    pub db_pool: PgPool,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Static API key validator.
    pub api_keys: Arc<ApiKeyValidator>,
    /// Audit event service.
    pub audit_service: Arc<AuditService>,
}
