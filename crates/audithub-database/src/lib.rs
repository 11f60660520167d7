//! # audithub-database
//!
//! PostgreSQL connection management, migrations, and the concrete
//! [`repositories::audit::AuditEventRepository`] implementing the
//! audit event store port.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
