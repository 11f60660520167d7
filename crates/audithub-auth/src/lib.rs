//! # audithub-auth
//!
//! Request authentication: JWT bearer tokens and static API keys.

pub mod api_key;
pub mod jwt;

pub use api_key::ApiKeyValidator;
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
