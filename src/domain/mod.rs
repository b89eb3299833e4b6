//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod identity;
pub mod quiz;

pub use cache::{Cache, CacheGate, CacheKeyBuilder, CacheRequest, ResponseCacheConfig};
pub use error::DomainError;
pub use identity::CallerIdentity;
