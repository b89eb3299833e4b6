//! Response caching - fail-open store and request interception

mod interceptor;
mod service;

pub use interceptor::{CacheInterceptor, CacheOutcome};
pub use service::ResponseCache;
