//! Repository implementations.

pub mod audit;
