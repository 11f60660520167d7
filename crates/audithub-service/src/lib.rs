//! # audithub-service
//!
//! Business logic sitting between the HTTP layer and the store: audit
//! event lifecycle rules and the notification fan-out.

pub mod audit;
pub mod notification;

pub use audit::AuditService;
pub use notification::NotificationService;
