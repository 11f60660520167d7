//! Store port for audit event persistence.

use async_trait::async_trait;
use uuid::Uuid;

use audithub_core::result::AppResult;

use super::filter::{AuditEventFilter, PaginatedAuditEvents};
use super::model::{AuditEvent, NewAuditEvent, UpdateStatusRequest};

/// Persistence boundary for audit events.
///
/// Implemented over PostgreSQL by `audithub-database`; service tests swap
/// in an in-memory mock. All business rules live above this trait; the
/// store only persists and queries.
#[async_trait]
pub trait AuditEventStore: Send + Sync + 'static {
    /// Persists a new event, assigning its identifier and all three
    /// timestamps. Fails with a `Database` error on any store failure.
    async fn create(&self, event: &NewAuditEvent) -> AppResult<AuditEvent>;

    /// Fetches one event, or `None` when no row matches.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEvent>>;

    /// Lists events matching the filter: total count first, then the page
    /// ordered by event timestamp descending.
    async fn list(&self, filter: &AuditEventFilter) -> AppResult<PaginatedAuditEvents>;

    /// Counts events matching the filter, ignoring pagination.
    async fn count(&self, filter: &AuditEventFilter) -> AppResult<i64>;

    /// Hard-deletes one event. Fails with `NotFound` when no row matched.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Partial update: always sets status and refreshes `updated_at`;
    /// sets data/meta only when provided. Fails with `NotFound` when no
    /// row matched.
    async fn update_status(&self, id: Uuid, update: &UpdateStatusRequest) -> AppResult<()>;
}
