//! Request and response shapes specific to the HTTP layer.

pub mod query;

pub use query::{ListEventsQuery, StatsQuery};
