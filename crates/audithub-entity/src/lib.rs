//! # audithub-entity
//!
//! Domain entity models for AuditHub: the audit event record, its
//! create/update request types, query filters, pagination wrappers, and
//! the [`audit::store::AuditEventStore`] port implemented by the database
//! crate and mocked in service tests.

pub mod audit;
