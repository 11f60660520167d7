//! Channel eligibility rules: which events reach which channels.

/// Event-name fragments that mark an event as security-critical.
const CRITICAL_EVENT_MARKERS: [&str; 3] = ["DELETE", "UNAUTHORIZED_ACCESS", "SECURITY_BREACH"];

/// Email goes out only for security-critical events.
///
/// The match is a case-insensitive substring check, so `USER_DELETED`
/// and `user_deleted` both qualify via the `DELETE` marker.
pub fn requires_email(event: &str) -> bool {
    let upper = event.to_uppercase();
    CRITICAL_EVENT_MARKERS
        .iter()
        .any(|marker| upper.contains(marker))
}

/// Slack receives every event originating from production.
pub fn requires_slack(environment: &str) -> bool {
    environment == "production"
}

/// Webhooks receive every event.
pub fn requires_webhook() -> bool {
    true
}
