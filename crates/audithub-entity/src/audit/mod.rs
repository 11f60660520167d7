//! Audit event entity, filters, and store port.

pub mod filter;
pub mod model;
pub mod store;

pub use filter::{AuditEventFilter, AuditStats, PaginatedAuditEvents, StatsPeriod, DEFAULT_LIMIT, MAX_LIMIT};
pub use model::{AuditEvent, CreateAuditEventRequest, NewAuditEvent, UpdateStatusRequest};
pub use store::AuditEventStore;
