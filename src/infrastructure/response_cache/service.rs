//! Fail-open response cache over a key-value backend

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::domain::cache::Cache;
use crate::infrastructure::observability::{CacheOperation, record_cache_backend_error};

/// TTL-keyed response store that never fails a request
///
/// Backend read failures are reported as misses, write failures are logged
/// and swallowed. Expiry is enforced by the backend.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    backend: Arc<dyn Cache>,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn Cache> {
        &self.backend
    }

    /// Looks up a cached value; `None` on miss, backend error or corrupt entry
    pub async fn get<V>(&self, key: &str) -> Option<V>
    where
        V: DeserializeOwned,
    {
        let raw = match self.backend.get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(key = %key, error = %e, "Response cache read failed, treating as miss");
                record_cache_backend_error(CacheOperation::Get);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable response cache entry");

                if let Err(e) = self.backend.delete(key).await {
                    debug!(key = %key, error = %e, "Failed to delete unreadable cache entry");
                }

                None
            }
        }
    }

    /// Stores a value under `key`, overwriting any previous value
    pub async fn set<V>(&self, key: &str, value: &V, ttl: Duration)
    where
        V: Serialize + Sync,
    {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to serialize response for caching");
                return;
            }
        };

        if let Err(e) = self.backend.set_raw(key, &raw, ttl).await {
            error!(key = %key, error = %e, "Response cache write failed, response not cached");
            record_cache_backend_error(CacheOperation::Set);
        }
    }

    /// Removes the entry under `key`, if any
    pub async fn invalidate(&self, key: &str) {
        match self.backend.delete(key).await {
            Ok(true) => debug!(key = %key, "Invalidated response cache entry"),
            Ok(false) => {}
            Err(e) => {
                error!(key = %key, error = %e, "Response cache invalidation failed");
                record_cache_backend_error(CacheOperation::Delete);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;

    #[tokio::test]
    async fn test_round_trip() {
        let backend = Arc::new(MockCache::new());
        let cache = ResponseCache::new(backend.clone());

        cache
            .set("anonymous:/v1/topics:{}", &vec!["algebra".to_string()], Duration::from_secs(60))
            .await;

        let value: Option<Vec<String>> = cache.get("anonymous:/v1/topics:{}").await;
        assert_eq!(value, Some(vec!["algebra".to_string()]));
        assert_eq!(
            backend.stored_ttl("anonymous:/v1/topics:{}"),
            Some(Duration::from_secs(60))
        );
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = ResponseCache::new(Arc::new(MockCache::new()));

        cache.set("k", &1u32, Duration::from_secs(60)).await;
        cache.set("k", &2u32, Duration::from_secs(60)).await;

        assert_eq!(cache.get::<u32>("k").await, Some(2));
    }

    #[tokio::test]
    async fn test_read_failure_is_a_miss() {
        let backend = Arc::new(MockCache::new().with_get_error("connection refused"));
        let cache = ResponseCache::new(backend.clone());

        let value: Option<String> = cache.get("k").await;

        assert!(value.is_none());
        assert_eq!(backend.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let backend = Arc::new(MockCache::new().with_set_error("read-only replica"));
        let cache = ResponseCache::new(backend.clone());

        cache.set("k", &"value", Duration::from_secs(60)).await;

        assert_eq!(backend.set_calls(), 1);
        assert!(backend.keys().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_deleted() {
        let backend = Arc::new(MockCache::new().with_raw_entry(
            "k",
            "{not json",
            Duration::from_secs(60),
        ));
        let cache = ResponseCache::new(backend.clone());

        let value: Option<u32> = cache.get("k").await;

        assert!(value.is_none());
        assert!(!backend.exists("k").await.unwrap());
    }
}
