//! PostgreSQL repository for audit events.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use audithub_core::error::{AppError, ErrorKind};
use audithub_core::AppResult;
use audithub_entity::audit::{
    AuditEvent, AuditEventFilter, AuditEventStore, NewAuditEvent, PaginatedAuditEvents,
    UpdateStatusRequest,
};

const AUDIT_COLUMNS: &str = "id, tenant_id, user_id, resource, event, method, ip, status, \
     data, environment, meta, timestamp, created_at, updated_at";

/// Row type mirroring the `audit_events` table.
#[derive(Debug, sqlx::FromRow)]
struct AuditEventRow {
    id: Uuid,
    tenant_id: String,
    user_id: String,
    resource: String,
    event: String,
    method: String,
    ip: String,
    status: String,
    data: Option<serde_json::Value>,
    environment: String,
    meta: Json<HashMap<String, serde_json::Value>>,
    timestamp: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AuditEventRow> for AuditEvent {
    fn from(row: AuditEventRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            resource: row.resource,
            event: row.event,
            method: row.method,
            ip: row.ip,
            status: row.status,
            data: row.data,
            environment: row.environment,
            meta: row.meta.0,
            timestamp: row.timestamp,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// sqlx-backed implementation of [`AuditEventStore`].
#[derive(Debug, Clone)]
pub struct AuditEventRepository {
    pool: PgPool,
}

impl AuditEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds the WHERE clause for a filter using positional parameters.
///
/// Returns the clause (empty when the filter has no predicates) and the
/// next free parameter index. Bind order must match
/// [`bind_order`]: equality predicates first, then the date bounds.
fn where_clause(filter: &AuditEventFilter) -> (String, usize) {
    let mut conditions: Vec<String> = Vec::new();
    let mut idx = 1usize;

    for (column, value) in [
        ("tenant_id", &filter.tenant_id),
        ("user_id", &filter.user_id),
        ("resource", &filter.resource),
        ("event", &filter.event),
        ("method", &filter.method),
        ("status", &filter.status),
        ("environment", &filter.environment),
    ] {
        if value.is_some() {
            conditions.push(format!("{column} = ${idx}"));
            idx += 1;
        }
    }
    if filter.start_date.is_some() {
        conditions.push(format!("timestamp >= ${idx}"));
        idx += 1;
    }
    if filter.end_date.is_some() {
        conditions.push(format!("timestamp <= ${idx}"));
        idx += 1;
    }

    if conditions.is_empty() {
        (String::new(), idx)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), idx)
    }
}

/// Present filter values in the order `where_clause` numbered them.
fn bind_order(filter: &AuditEventFilter) -> Vec<BindValue<'_>> {
    let mut values: Vec<BindValue<'_>> = Vec::new();
    for value in [
        &filter.tenant_id,
        &filter.user_id,
        &filter.resource,
        &filter.event,
        &filter.method,
        &filter.status,
        &filter.environment,
    ]
    .into_iter()
    .flatten()
    {
        values.push(BindValue::Text(value));
    }
    if let Some(start) = filter.start_date {
        values.push(BindValue::Timestamp(start));
    }
    if let Some(end) = filter.end_date {
        values.push(BindValue::Timestamp(end));
    }
    values
}

enum BindValue<'a> {
    Text(&'a str),
    Timestamp(DateTime<Utc>),
}

fn database_error(context: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

#[async_trait]
impl AuditEventStore for AuditEventRepository {
    async fn create(&self, event: &NewAuditEvent) -> AppResult<AuditEvent> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO audit_events (id, tenant_id, user_id, resource, event, method, ip, \
             status, data, environment, meta, timestamp, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(id)
        .bind(&event.tenant_id)
        .bind(&event.user_id)
        .bind(&event.resource)
        .bind(&event.event)
        .bind(&event.method)
        .bind(&event.ip)
        .bind(&event.status)
        .bind(&event.data)
        .bind(&event.environment)
        .bind(Json(&event.meta))
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("Failed to insert audit event", e))?;

        Ok(AuditEvent {
            id,
            tenant_id: event.tenant_id.clone(),
            user_id: event.user_id.clone(),
            resource: event.resource.clone(),
            event: event.event.clone(),
            method: event.method.clone(),
            ip: event.ip.clone(),
            status: event.status.clone(),
            data: event.data.clone(),
            environment: event.environment.clone(),
            meta: event.meta.clone(),
            timestamp: now,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEvent>> {
        let row: Option<AuditEventRow> = sqlx::query_as(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("Failed to fetch audit event", e))?;

        Ok(row.map(AuditEvent::from))
    }

    async fn list(&self, filter: &AuditEventFilter) -> AppResult<PaginatedAuditEvents> {
        let filter = filter.normalized();
        let total = self.count(&filter).await?;

        let (clause, next_idx) = where_clause(&filter);
        let sql = format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_events{clause} \
             ORDER BY timestamp DESC LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );

        let mut query = sqlx::query_as::<_, AuditEventRow>(&sql);
        for value in bind_order(&filter) {
            query = match value {
                BindValue::Text(v) => query.bind(v.to_string()),
                BindValue::Timestamp(v) => query.bind(v),
            };
        }
        let rows = query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("Failed to list audit events", e))?;

        let data = rows.into_iter().map(AuditEvent::from).collect();
        Ok(PaginatedAuditEvents::new(
            data,
            total,
            filter.limit,
            filter.offset,
        ))
    }

    async fn count(&self, filter: &AuditEventFilter) -> AppResult<i64> {
        let (clause, _) = where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM audit_events{clause}");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in bind_order(filter) {
            query = match value {
                BindValue::Text(v) => query.bind(v.to_string()),
                BindValue::Timestamp(v) => query.bind(v),
            };
        }
        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("Failed to count audit events", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM audit_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to delete audit event", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Audit event {id} not found")));
        }
        Ok(())
    }

    async fn update_status(&self, id: Uuid, update: &UpdateStatusRequest) -> AppResult<()> {
        let mut sets = vec!["status = $1".to_string(), "updated_at = $2".to_string()];
        let mut idx = 3usize;
        if update.data.is_some() {
            sets.push(format!("data = ${idx}"));
            idx += 1;
        }
        if update.meta.is_some() {
            sets.push(format!("meta = ${idx}"));
            idx += 1;
        }
        let sql = format!(
            "UPDATE audit_events SET {} WHERE id = ${idx}",
            sets.join(", ")
        );

        let mut query = sqlx::query(&sql).bind(&update.status).bind(Utc::now());
        if let Some(data) = &update.data {
            query = query.bind(data);
        }
        if let Some(meta) = &update.meta {
            query = query.bind(Json(meta));
        }
        let result = query
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| database_error("Failed to update audit event status", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Audit event {id} not found")));
        }
        Ok(())
    }
}
