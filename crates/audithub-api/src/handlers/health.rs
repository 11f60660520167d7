//! Health, readiness, and liveness probes.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::state::AppState;

/// Response body for the full health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub checks: HashMap<String, String>,
}

async fn ping_database(state: &AppState, timeout: Duration) -> Result<(), String> {
    let ping = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db_pool);
    match tokio::time::timeout(timeout, ping).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("timed out".to_string()),
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HashMap::new(),
    };

    match ping_database(&state, Duration::from_secs(5)).await {
        Ok(()) => {
            response.checks.insert("database".to_string(), "healthy".to_string());
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            error!(error = %e, "Database health check failed");
            response.status = "unhealthy".to_string();
            response
                .checks
                .insert("database".to_string(), format!("unhealthy: {e}"));
            (StatusCode::SERVICE_UNAVAILABLE, Json(response))
        }
    }
}

/// GET /ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match ping_database(&state, Duration::from_secs(2)).await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "not ready", "error": e})),
            )
        }
    }
}

/// GET /live
pub async fn live() -> Json<serde_json::Value> {
    Json(json!({"status": "alive"}))
}
