//! Audit event endpoints.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use audithub_entity::audit::{
    AuditEvent, CreateAuditEventRequest, PaginatedAuditEvents, UpdateStatusRequest,
};

use crate::dto::{ListEventsQuery, StatsQuery};
use crate::error::ApiError;
use crate::extractors::AuthContext;
use crate::state::AppState;

/// POST /api/v1/audit
///
/// An empty `ip` is substituted with the connecting client's address
/// before validation.
pub async fn create_event(
    State(state): State<AppState>,
    _auth: AuthContext,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(mut req): Json<CreateAuditEventRequest>,
) -> Result<(StatusCode, Json<AuditEvent>), ApiError> {
    if req.ip.is_empty() {
        req.ip = addr.ip().to_string();
    }

    let created = state.audit_service.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/audit
pub async fn list_events(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<PaginatedAuditEvents>, ApiError> {
    let filter = query.into_filter()?;
    let page = state.audit_service.list(&filter).await?;
    Ok(Json(page))
}

/// GET /api/v1/audit/{id}
pub async fn get_event(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> Result<Json<AuditEvent>, ApiError> {
    let event = state.audit_service.get(&id).await?;
    Ok(Json(event))
}

/// DELETE /api/v1/audit/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.audit_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/audit/{id}/status
pub async fn update_event_status(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.audit_service.update_status(&id, &req).await?;
    Ok(Json(json!({
        "message": "audit event status updated successfully"
    })))
}

/// GET /api/v1/audit/stats
pub async fn get_stats(
    State(state): State<AppState>,
    _auth: AuthContext,
    Query(query): Query<StatsQuery>,
) -> Result<Json<audithub_entity::audit::AuditStats>, ApiError> {
    let (tenant_id, start_date, end_date) = query.resolve()?;
    let stats = state
        .audit_service
        .stats(&tenant_id, start_date, end_date)
        .await?;
    Ok(Json(stats))
}
