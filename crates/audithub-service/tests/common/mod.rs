//! Shared in-memory test doubles for the service layer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use audithub_core::config::{
    AuditConfig, EmailConfig, NotificationConfig, SlackConfig, WebhookConfig,
};
use audithub_core::error::AppError;
use audithub_core::AppResult;
use audithub_entity::audit::{
    AuditEvent, AuditEventFilter, AuditEventStore, NewAuditEvent, PaginatedAuditEvents,
    UpdateStatusRequest,
};
use audithub_notify::{EmailSender, SlackSender, WebhookSender};

/// In-memory store recording every call.
#[derive(Default)]
pub struct MemoryStore {
    pub events: Mutex<Vec<AuditEvent>>,
    pub create_calls: AtomicUsize,
    pub list_calls: Mutex<Vec<AuditEventFilter>>,
    pub count_calls: Mutex<Vec<AuditEventFilter>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(event: &AuditEvent, filter: &AuditEventFilter) -> bool {
        let eq = |want: &Option<String>, have: &str| {
            want.as_ref().map(|w| w == have).unwrap_or(true)
        };
        eq(&filter.tenant_id, &event.tenant_id)
            && eq(&filter.user_id, &event.user_id)
            && eq(&filter.resource, &event.resource)
            && eq(&filter.event, &event.event)
            && eq(&filter.method, &event.method)
            && eq(&filter.status, &event.status)
            && eq(&filter.environment, &event.environment)
            && filter.start_date.map(|s| event.timestamp >= s).unwrap_or(true)
            && filter.end_date.map(|e| event.timestamp <= e).unwrap_or(true)
    }
}

#[async_trait]
impl AuditEventStore for MemoryStore {
    async fn create(&self, event: &NewAuditEvent) -> AppResult<AuditEvent> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let created = AuditEvent {
            id: Uuid::new_v4(),
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
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEvent>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list(&self, filter: &AuditEventFilter) -> AppResult<PaginatedAuditEvents> {
        self.list_calls.lock().unwrap().push(filter.clone());
        let mut matching: Vec<AuditEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| Self::matches(e, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let total = matching.len() as i64;
        let page: Vec<AuditEvent> = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect();
        Ok(PaginatedAuditEvents::new(
            page,
            total,
            filter.limit,
            filter.offset,
        ))
    }

    async fn count(&self, filter: &AuditEventFilter) -> AppResult<i64> {
        self.count_calls.lock().unwrap().push(filter.clone());
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| Self::matches(e, filter))
            .count() as i64)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(AppError::not_found(format!("Audit event {id} not found")));
        }
        Ok(())
    }

    async fn update_status(&self, id: Uuid, update: &UpdateStatusRequest) -> AppResult<()> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::not_found(format!("Audit event {id} not found")))?;
        event.status = update.status.clone();
        if let Some(data) = &update.data {
            event.data = Some(data.clone());
        }
        if let Some(meta) = &update.meta {
            event.meta = meta.clone();
        }
        event.updated_at = Utc::now();
        Ok(())
    }
}

/// Email double recording (subject, body) pairs.
#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, subject: &str, body: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::notification("smtp relay unreachable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Slack double recording message texts.
#[derive(Default)]
pub struct RecordingSlackSender {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl SlackSender for RecordingSlackSender {
    async fn send(&self, text: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::notification("slack webhook returned HTTP 500"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Webhook double recording payloads.
#[derive(Default)]
pub struct RecordingWebhookSender {
    pub sent: Mutex<Vec<Map<String, Value>>>,
    pub fail: bool,
}

#[async_trait]
impl WebhookSender for RecordingWebhookSender {
    async fn send(&self, payload: &Map<String, Value>) -> AppResult<()> {
        if self.fail {
            return Err(AppError::notification("webhook endpoint unreachable"));
        }
        self.sent.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

/// Audit configuration mirroring the shipped defaults.
pub fn audit_config() -> AuditConfig {
    AuditConfig {
        enabled: true,
        default_status: "pending".to_string(),
        status_values: vec![
            "pending".to_string(),
            "processing".to_string(),
            "completed".to_string(),
            "failed".to_string(),
            "archived".to_string(),
        ],
        error_status: "failed".to_string(),
    }
}

/// Notification configuration with all three channels switched on.
pub fn all_channels_enabled() -> NotificationConfig {
    NotificationConfig {
        email: EmailConfig {
            enabled: true,
            ..Default::default()
        },
        slack: SlackConfig {
            enabled: true,
            ..Default::default()
        },
        webhook: WebhookConfig {
            enabled: true,
            ..Default::default()
        },
    }
}

/// A structurally valid create request.
pub fn create_request() -> audithub_entity::audit::CreateAuditEventRequest {
    audithub_entity::audit::CreateAuditEventRequest {
        tenant_id: "tenant-1".to_string(),
        user_id: "user-1".to_string(),
        resource: "users".to_string(),
        event: "USER_CREATED".to_string(),
        method: "post".to_string(),
        ip: "192.168.1.100".to_string(),
        status: None,
        data: None,
        environment: "development".to_string(),
        meta: None,
    }
}

/// A production event whose name qualifies for every channel.
pub fn critical_event() -> AuditEvent {
    let now = Utc::now();
    AuditEvent {
        id: Uuid::new_v4(),
        tenant_id: "tenant-1".to_string(),
        user_id: "user-1".to_string(),
        resource: "users".to_string(),
        event: "USER_DELETED".to_string(),
        method: "DELETE".to_string(),
        ip: "10.0.0.1".to_string(),
        status: "pending".to_string(),
        data: None,
        environment: "production".to_string(),
        meta: HashMap::new(),
        timestamp: now,
        created_at: now,
        updated_at: now,
    }
}
