//! Query-string shapes for the audit endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use audithub_core::error::AppError;
use audithub_core::AppResult;
use audithub_entity::audit::{AuditEventFilter, DEFAULT_LIMIT};

/// Query parameters for `GET /api/v1/audit`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEventsQuery {
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    pub resource: Option<String>,
    pub event: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    pub environment: Option<String>,
    /// RFC3339 lower bound on the event timestamp.
    pub start_date: Option<String>,
    /// RFC3339 upper bound on the event timestamp.
    pub end_date: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListEventsQuery {
    /// Converts into a store filter, rejecting malformed dates.
    pub fn into_filter(self) -> AppResult<AuditEventFilter> {
        Ok(AuditEventFilter {
            tenant_id: self.tenant_id,
            user_id: self.user_id,
            resource: self.resource,
            event: self.event,
            method: self.method,
            status: self.status,
            environment: self.environment,
            start_date: parse_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_date(self.end_date.as_deref(), "end_date")?,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// Query parameters for `GET /api/v1/audit/stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsQuery {
    pub tenant_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StatsQuery {
    /// Resolves the required parameters, all of which must be present.
    pub fn resolve(self) -> AppResult<(String, DateTime<Utc>, DateTime<Utc>)> {
        let tenant_id = self
            .tenant_id
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::invalid_input("tenant_id is required"))?;
        let (Some(start), Some(end)) = (self.start_date, self.end_date) else {
            return Err(AppError::invalid_input(
                "Both start_date and end_date are required",
            ));
        };
        let start = parse_date(Some(&start), "start_date")?
            .ok_or_else(|| AppError::invalid_input("start_date is required"))?;
        let end = parse_date(Some(&end), "end_date")?
            .ok_or_else(|| AppError::invalid_input("end_date is required"))?;
        Ok((tenant_id, start, end))
    }
}

fn parse_date(value: Option<&str>, field: &str) -> AppResult<Option<DateTime<Utc>>> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                AppError::invalid_input(format!("{field} must be in RFC3339 format"))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_query() -> ListEventsQuery {
        ListEventsQuery {
            tenant_id: None,
            user_id: None,
            resource: None,
            event: None,
            method: None,
            status: None,
            environment: None,
            start_date: None,
            end_date: None,
            limit: None,
            offset: None,
        }
    }

    #[test]
    fn defaults_apply_when_pagination_is_absent() {
        let filter = empty_query().into_filter().unwrap();
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut query = empty_query();
        query.start_date = Some("june 1st".to_string());
        let err = query.into_filter().unwrap_err();
        assert!(err.message.contains("RFC3339"));
    }

    #[test]
    fn valid_dates_are_parsed_to_utc() {
        let mut query = empty_query();
        query.start_date = Some("2025-06-01T00:00:00+02:00".to_string());
        let filter = query.into_filter().unwrap();
        assert_eq!(
            filter.start_date.unwrap().to_rfc3339(),
            "2025-05-31T22:00:00+00:00"
        );
    }

    #[test]
    fn stats_requires_all_parameters() {
        let query = StatsQuery {
            tenant_id: Some("t1".to_string()),
            start_date: Some("2025-06-01T00:00:00Z".to_string()),
            end_date: None,
        };
        let err = query.resolve().unwrap_err();
        assert!(err.message.contains("required"));
    }
}
