//! Notification fan-out: channel eligibility rules, message formatting,
//! and concurrent dispatch.

pub mod format;
pub mod rules;
pub mod service;

pub use service::NotificationService;
