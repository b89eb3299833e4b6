//! API middleware components

pub mod caching;
pub mod identity;
pub mod logging;
pub mod metrics;

pub use caching::{CACHE_STATUS_HEADER, CachedResponse, caching_middleware};
pub use identity::{Caller, extract_bearer_token, identity_middleware};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
