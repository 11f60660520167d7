//! Audit event entity model and request payloads.

use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use audithub_core::error::AppError;

/// HTTP-style methods accepted on an audit event.
pub const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "PATCH"];

/// Deployment environments accepted on an audit event.
pub const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

/// A persisted audit event describing who did what, to what resource,
/// from where, in which environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Server-generated unique identifier.
    pub id: Uuid,
    /// Tenant isolation boundary the event belongs to.
    pub tenant_id: String,
    /// The user who performed the action.
    pub user_id: String,
    /// The resource acted upon (e.g., `"users"`).
    pub resource: String,
    /// The event name (e.g., `"USER_CREATED"`).
    pub event: String,
    /// HTTP-style method, uppercased before storage.
    pub method: String,
    /// Origin IP address of the actor.
    pub ip: String,
    /// Current status, constrained by the configured vocabulary.
    pub status: String,
    /// Opaque payload, stored and returned unmodified.
    pub data: Option<serde_json::Value>,
    /// Deployment environment the event originated from.
    pub environment: String,
    /// Arbitrary key-value metadata.
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A validated, normalized event ready for insertion. The store assigns
/// the identifier and all three timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEvent {
    /// Tenant identifier.
    pub tenant_id: String,
    /// User identifier.
    pub user_id: String,
    /// Resource name.
    pub resource: String,
    /// Event name.
    pub event: String,
    /// Method, already uppercased.
    pub method: String,
    /// Origin IP address.
    pub ip: String,
    /// Resolved status (request-supplied or configured default).
    pub status: String,
    /// Opaque payload.
    pub data: Option<serde_json::Value>,
    /// Deployment environment.
    pub environment: String,
    /// Key-value metadata.
    pub meta: HashMap<String, serde_json::Value>,
}

/// Request payload for creating an audit event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAuditEventRequest {
    /// Tenant identifier.
    #[validate(length(min = 1, message = "is required"))]
    pub tenant_id: String,
    /// User identifier.
    #[validate(length(min = 1, message = "is required"))]
    pub user_id: String,
    /// Resource name.
    #[validate(length(min = 1, message = "is required"))]
    pub resource: String,
    /// Event name.
    #[validate(length(min = 1, message = "is required"))]
    pub event: String,
    /// HTTP-style method; any case accepted, uppercased before storage.
    #[validate(custom(function = "validate_method"))]
    pub method: String,
    /// Origin IP address (IPv4 or IPv6).
    #[validate(custom(function = "validate_ip"))]
    pub ip: String,
    /// Optional status; the configured default is used when omitted.
    #[serde(default)]
    pub status: Option<String>,
    /// Optional opaque payload.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// Deployment environment.
    #[validate(custom(function = "validate_environment"))]
    pub environment: String,
    /// Optional key-value metadata.
    #[serde(default)]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

impl CreateAuditEventRequest {
    /// Runs structural validation, reporting every violated field.
    pub fn validate_structure(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            let mut violations: Vec<String> = errors
                .field_errors()
                .iter()
                .map(|(field, errs)| {
                    let reasons: Vec<String> = errs
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    format!("{field} {}", reasons.join(", "))
                })
                .collect();
            violations.sort();
            AppError::validation(format!("validation failed: {}", violations.join("; ")))
        })
    }
}

/// Request payload for the partial status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// The new status value.
    pub status: String,
    /// Replacement opaque payload; untouched when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Replacement metadata; untouched when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, serde_json::Value>>,
}

fn validate_method(method: &str) -> Result<(), ValidationError> {
    let upper = method.to_uppercase();
    if ALLOWED_METHODS.contains(&upper.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("method")
            .with_message("must be one of GET, POST, PUT, DELETE, PATCH".into()))
    }
}

fn validate_ip(ip: &str) -> Result<(), ValidationError> {
    if ip.parse::<IpAddr>().is_ok() {
        Ok(())
    } else {
        Err(ValidationError::new("ip").with_message("must be a valid IPv4 or IPv6 address".into()))
    }
}

fn validate_environment(environment: &str) -> Result<(), ValidationError> {
    if ENVIRONMENTS.contains(&environment) {
        Ok(())
    } else {
        Err(ValidationError::new("environment")
            .with_message("must be one of development, staging, production".into()))
    }
}
