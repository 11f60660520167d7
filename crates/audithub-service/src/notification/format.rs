//! Per-channel message rendering.

use serde_json::{Map, Value};

use audithub_entity::audit::AuditEvent;

/// Timestamp format used in human-readable messages.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Payload marker identifying audit notifications on the wire.
const NOTIFICATION_TYPE: &str = "audit_alert";

/// Subject line for email alerts.
pub fn email_subject(event: &AuditEvent) -> String {
    format!("Audit Alert: {} - {}", event.event, event.resource)
}

/// Plain-text email body.
pub fn email_body(event: &AuditEvent) -> String {
    let data = event
        .data
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_default();

    format!(
        "\nAudit Event Alert\n\n\
         ID: {}\n\
         Tenant: {}\n\
         User: {}\n\
         Resource: {}\n\
         Event: {}\n\
         Method: {}\n\
         IP Address: {}\n\
         Environment: {}\n\
         Timestamp: {}\n\n\
         Data: {}\n\n\
         This is an automated notification from AuditHub.\n",
        event.id,
        event.tenant_id,
        event.user_id,
        event.resource,
        event.event,
        event.method,
        event.ip,
        event.environment,
        event.timestamp.format(TIMESTAMP_FORMAT),
        data,
    )
}

/// Slack message with mrkdwn field labels.
pub fn slack_text(event: &AuditEvent) -> String {
    format!(
        ":rotating_light: *Audit Alert*\n\n\
         *Event:* {}\n\
         *Resource:* {}\n\
         *User:* {}\n\
         *Environment:* {}\n\
         *IP:* {}\n\
         *Time:* {}\n\n\
         *Tenant:* {}\n\
         *Method:* {}\n\
         *ID:* {}",
        event.event,
        event.resource,
        event.user_id,
        event.environment,
        event.ip,
        event.timestamp.format(TIMESTAMP_FORMAT),
        event.tenant_id,
        event.method,
        event.id,
    )
}

/// Structured webhook payload.
pub fn webhook_payload(event: &AuditEvent) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("id".to_string(), Value::String(event.id.to_string()));
    payload.insert(
        "tenant_id".to_string(),
        Value::String(event.tenant_id.clone()),
    );
    payload.insert("user_id".to_string(), Value::String(event.user_id.clone()));
    payload.insert(
        "resource".to_string(),
        Value::String(event.resource.clone()),
    );
    payload.insert("event".to_string(), Value::String(event.event.clone()));
    payload.insert("method".to_string(), Value::String(event.method.clone()));
    payload.insert("ip".to_string(), Value::String(event.ip.clone()));
    payload.insert(
        "environment".to_string(),
        Value::String(event.environment.clone()),
    );
    payload.insert(
        "timestamp".to_string(),
        Value::String(event.timestamp.to_rfc3339()),
    );
    payload.insert(
        "data".to_string(),
        event.data.clone().unwrap_or(Value::Null),
    );
    payload.insert(
        "meta".to_string(),
        Value::Object(event.meta.clone().into_iter().collect()),
    );
    payload.insert(
        "notification_type".to_string(),
        Value::String(NOTIFICATION_TYPE.to_string()),
    );
    payload
}
