//! Query filter, pagination, and statistics types for audit events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::AuditEvent;

/// Default page size for list queries.
pub const DEFAULT_LIMIT: i64 = 50;
/// Maximum page size for list queries.
pub const MAX_LIMIT: i64 = 1000;

/// Optional equality and range predicates for listing audit events.
///
/// Omitted fields impose no constraint; present fields compose
/// conjunctively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditEventFilter {
    /// Filter by tenant identifier.
    pub tenant_id: Option<String>,
    /// Filter by user identifier.
    pub user_id: Option<String>,
    /// Filter by resource name.
    pub resource: Option<String>,
    /// Filter by event name.
    pub event: Option<String>,
    /// Filter by method.
    pub method: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by environment.
    pub environment: Option<String>,
    /// Inclusive lower bound on the event timestamp.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the event timestamp.
    pub end_date: Option<DateTime<Utc>>,
    /// Page size (default 50, clamped to [1, 1000]).
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of records to skip (clamped to >= 0).
    #[serde(default)]
    pub offset: i64,
}

impl AuditEventFilter {
    /// Returns a copy with limit and offset clamped to their legal ranges.
    ///
    /// A non-positive limit falls back to the default of 50; limits above
    /// 1000 are capped; negative offsets become 0.
    pub fn normalized(&self) -> Self {
        let mut filter = self.clone();
        if filter.limit <= 0 {
            filter.limit = DEFAULT_LIMIT;
        }
        if filter.limit > MAX_LIMIT {
            filter.limit = MAX_LIMIT;
        }
        if filter.offset < 0 {
            filter.offset = 0;
        }
        filter
    }

    /// Returns true when both bounds are present and inverted.
    pub fn has_inverted_date_range(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start > end)
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// One page of audit events plus the total matching count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedAuditEvents {
    /// The records on this page, ordered by event timestamp descending.
    pub data: Vec<AuditEvent>,
    /// Total matching records independent of pagination.
    pub total: i64,
    /// Echoed effective limit.
    pub limit: i64,
    /// Echoed effective offset.
    pub offset: i64,
    /// Whether further pages remain (`offset + limit < total`).
    pub has_more: bool,
}

impl PaginatedAuditEvents {
    /// Builds a page, deriving `has_more` from the pagination bounds.
    pub fn new(data: Vec<AuditEvent>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            data,
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        }
    }
}

/// Aggregate counts for a tenant over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditStats {
    /// Total events for the tenant in the period.
    pub total_logs: i64,
    /// Events whose status equals the configured error status.
    pub error_count: i64,
    /// The queried tenant.
    pub tenant_id: String,
    /// The queried period.
    pub period: StatsPeriod,
}

/// Echoed date range for a statistics query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsPeriod {
    /// Inclusive period start.
    pub start_date: DateTime<Utc>,
    /// Inclusive period end.
    pub end_date: DateTime<Utc>,
}
