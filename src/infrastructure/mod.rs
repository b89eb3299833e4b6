//! Infrastructure layer - External service implementations

pub mod auth;
pub mod cache;
pub mod logging;
pub mod observability;
pub mod quiz;
pub mod response_cache;
pub mod services;
