//! Audit event business rules: validation, status resolution, and the
//! hand-off to the notification fan-out.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use audithub_core::config::AuditConfig;
use audithub_core::error::AppError;
use audithub_core::AppResult;
use audithub_entity::audit::{
    AuditEvent, AuditEventFilter, AuditEventStore, AuditStats, CreateAuditEventRequest,
    NewAuditEvent, PaginatedAuditEvents, StatsPeriod, UpdateStatusRequest,
};

use crate::notification::NotificationService;

/// Orchestrates audit event operations over the store.
#[derive(Clone)]
pub struct AuditService {
    /// Persistence port.
    store: Arc<dyn AuditEventStore>,
    /// Fan-out target; `None` disables notifications entirely.
    notifier: Option<Arc<NotificationService>>,
    /// Status vocabulary configuration.
    config: AuditConfig,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(
        store: Arc<dyn AuditEventStore>,
        notifier: Option<Arc<NotificationService>>,
        config: AuditConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// Creates an audit event after full validation.
    ///
    /// Notification dispatch is detached: the created event is returned
    /// as soon as the row is persisted, and delivery failures are only
    /// logged.
    pub async fn create(&self, req: CreateAuditEventRequest) -> AppResult<AuditEvent> {
        req.validate_structure()?;

        // validator already checked the format; parse again so a malformed
        // address can never reach the store.
        if req.ip.parse::<IpAddr>().is_err() {
            return Err(AppError::invalid_input(format!(
                "invalid IP address: {}",
                req.ip
            )));
        }

        let status = self.resolve_status(req.status.as_deref())?;

        let new_event = NewAuditEvent {
            tenant_id: req.tenant_id,
            user_id: req.user_id,
            resource: req.resource,
            event: req.event,
            method: req.method.to_uppercase(),
            ip: req.ip,
            status,
            data: req.data,
            environment: req.environment,
            meta: req.meta.unwrap_or_default(),
        };

        let created = self.store.create(&new_event).await?;

        info!(
            audit_event_id = %created.id,
            tenant_id = %created.tenant_id,
            user_id = %created.user_id,
            resource = %created.resource,
            event = %created.event,
            "Audit event created"
        );

        if let Some(notifier) = &self.notifier {
            let notifier = Arc::clone(notifier);
            let event = created.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.dispatch(&event).await {
                    warn!(audit_event_id = %event.id, error = %e, "Notification dispatch failed");
                }
            });
        }

        Ok(created)
    }

    /// Fetches a single audit event by its string identifier.
    pub async fn get(&self, id: &str) -> AppResult<AuditEvent> {
        let id = parse_event_id(id)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit event {id} not found")))
    }

    /// Lists audit events matching the filter, newest first.
    pub async fn list(&self, filter: &AuditEventFilter) -> AppResult<PaginatedAuditEvents> {
        if filter.has_inverted_date_range() {
            return Err(AppError::invalid_input(
                "start date cannot be after end date",
            ));
        }

        let filter = filter.normalized();
        let page = self.store.list(&filter).await?;

        info!(
            total = page.total,
            limit = filter.limit,
            offset = filter.offset,
            tenant_id = filter.tenant_id.as_deref().unwrap_or(""),
            "Audit events listed"
        );

        Ok(page)
    }

    /// Deletes an audit event, verifying existence first.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let parsed = parse_event_id(id)?;

        let existing = self
            .store
            .find_by_id(parsed)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit event {parsed} not found")))?;

        self.store.delete(parsed).await?;

        info!(
            audit_event_id = %parsed,
            tenant_id = %existing.tenant_id,
            resource = %existing.resource,
            "Audit event deleted"
        );

        Ok(())
    }

    /// Applies a partial status update.
    ///
    /// `data` and `meta` are replaced only when present in the request.
    pub async fn update_status(&self, id: &str, req: &UpdateStatusRequest) -> AppResult<()> {
        let parsed = parse_event_id(id)?;

        if req.status.is_empty() {
            return Err(AppError::invalid_input("status is required"));
        }
        if self.config.enabled && !self.config.is_valid_status(&req.status) {
            return Err(AppError::invalid_input(format!(
                "invalid status '{}', must be one of: {}",
                req.status,
                self.config.permitted_values()
            )));
        }

        self.store.update_status(parsed, req).await?;

        info!(
            audit_event_id = %parsed,
            status = %req.status,
            has_data = req.data.is_some(),
            has_meta = req.meta.is_some(),
            "Audit event status updated"
        );

        Ok(())
    }

    /// Computes aggregate counts for a tenant over a date range.
    pub async fn stats(
        &self,
        tenant_id: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> AppResult<AuditStats> {
        if tenant_id.is_empty() {
            return Err(AppError::invalid_input("tenant_id is required"));
        }
        if start_date > end_date {
            return Err(AppError::invalid_input(
                "start date cannot be after end date",
            ));
        }

        let base = AuditEventFilter {
            tenant_id: Some(tenant_id.to_string()),
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        };
        let error_filter = AuditEventFilter {
            status: Some(self.config.error_status.clone()),
            ..base.clone()
        };

        let total_logs = self.store.count(&base).await?;
        let error_count = self.store.count(&error_filter).await?;

        Ok(AuditStats {
            total_logs,
            error_count,
            tenant_id: tenant_id.to_string(),
            period: StatsPeriod {
                start_date,
                end_date,
            },
        })
    }

    /// Resolves the effective status for a new event.
    ///
    /// An absent or empty status falls back to the configured default;
    /// the result must belong to the configured vocabulary unless status
    /// checking is disabled.
    fn resolve_status(&self, requested: Option<&str>) -> AppResult<String> {
        let status = match requested {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.config.default_status.clone(),
        };

        if self.config.enabled && !self.config.is_valid_status(&status) {
            return Err(AppError::invalid_input(format!(
                "invalid status '{status}', must be one of: {}",
                self.config.permitted_values()
            )));
        }

        Ok(status)
    }
}

/// Parses a string event identifier, rejecting empty and malformed values.
fn parse_event_id(id: &str) -> AppResult<Uuid> {
    if id.is_empty() {
        return Err(AppError::invalid_input("audit event ID is required"));
    }
    Uuid::parse_str(id)
        .map_err(|_| AppError::invalid_input(format!("invalid audit event ID: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_rejected() {
        let err = parse_event_id("").unwrap_err();
        assert!(err.message.contains("required"));
    }

    #[test]
    fn malformed_id_is_rejected() {
        assert!(parse_event_id("not-a-uuid").is_err());
    }

    #[test]
    fn valid_id_parses() {
        assert!(parse_event_id("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    }
}
