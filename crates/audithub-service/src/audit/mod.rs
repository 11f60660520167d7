//! Audit event lifecycle.

pub mod service;

pub use service::AuditService;
