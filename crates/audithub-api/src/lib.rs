//! # audithub-api
//!
//! HTTP surface for AuditHub. Routes live under `/api/v1/audit` with
//! liveness and readiness probes at the root. Handlers stay thin:
//! extract, call the service layer, map the result.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
