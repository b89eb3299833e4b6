//! Cache domain - response caching rules and the backend abstraction

mod gate;
mod key;
mod policy;
mod repository;
mod request;

pub use gate::{BypassReason, CacheGate};
pub use key::CacheKeyBuilder;
pub use policy::{ResponseCacheConfig, RoutePolicy};
pub use repository::Cache;
pub use request::CacheRequest;

#[cfg(test)]
pub use repository::mock::MockCache;
