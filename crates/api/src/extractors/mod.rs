//! Custom Axum extractors.

pub mod json;
pub mod user_auth;

pub use json::{ApiJson, ApiQuery};
pub use user_auth::{AdminAuth, UserAuth};
