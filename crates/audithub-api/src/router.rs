//! Route definitions for the AuditHub HTTP API.
//!
//! Audit routes are mounted under `/api/v1`; the health probes live at
//! the root so load balancers can reach them without credentials.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api/v1", audit_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Audit event CRUD, status updates, and statistics.
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/audit", post(handlers::audit::create_event))
        .route("/audit", get(handlers::audit::list_events))
        .route("/audit/stats", get(handlers::audit::get_stats))
        .route("/audit/{id}", get(handlers::audit::get_event))
        .route("/audit/{id}", delete(handlers::audit::delete_event))
        .route(
            "/audit/{id}/status",
            put(handlers::audit::update_event_status),
        )
}

/// Unauthenticated health probes.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/live", get(handlers::health::live))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new().allow_headers(Any);

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors.allow_methods(methods)
}
