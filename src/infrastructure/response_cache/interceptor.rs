//! Request-level caching around a downstream handler

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::service::ResponseCache;
use crate::domain::cache::{
    BypassReason, Cache, CacheGate, CacheKeyBuilder, CacheRequest, ResponseCacheConfig,
};
use crate::infrastructure::observability::{CacheLookup, record_cache_lookup};

/// How a value was produced
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome<V> {
    /// The cache was not consulted
    Bypassed(V, BypassReason),
    /// Served from the cache; downstream did not run
    Hit(V),
    /// Computed by downstream and stored best-effort
    Miss(V),
}

impl<V> CacheOutcome<V> {
    pub fn value(&self) -> &V {
        match self {
            Self::Bypassed(value, _) | Self::Hit(value) | Self::Miss(value) => value,
        }
    }

    pub fn into_value(self) -> V {
        match self {
            Self::Bypassed(value, _) | Self::Hit(value) | Self::Miss(value) => value,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Value of the `x-cache` response header
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bypassed(..) => "BYPASS",
            Self::Hit(_) => "HIT",
            Self::Miss(_) => "MISS",
        }
    }
}

/// Runs the bypass, lookup, downstream, store sequence for one request
#[derive(Debug, Clone)]
pub struct CacheInterceptor {
    gate: CacheGate,
    keys: CacheKeyBuilder,
    cache: ResponseCache,
}

impl CacheInterceptor {
    pub fn new(backend: Arc<dyn Cache>, config: ResponseCacheConfig) -> Self {
        Self {
            gate: CacheGate::new(config),
            keys: CacheKeyBuilder::new(),
            cache: ResponseCache::new(backend),
        }
    }

    pub fn gate(&self) -> &CacheGate {
        &self.gate
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Serves `request` from the cache or from `downstream`
    ///
    /// Downstream errors are returned unchanged and never cached. Cache
    /// backend failures never surface here.
    pub async fn intercept<V, E, F, Fut>(
        &self,
        request: &CacheRequest,
        downstream: F,
    ) -> Result<CacheOutcome<V>, E>
    where
        V: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(reason) = self.gate.bypass_reason(request) {
            debug!(path = %request.path(), reason = %reason, "Bypassing response cache");
            record_cache_lookup(CacheLookup::Bypass);
            return downstream()
                .await
                .map(|value| CacheOutcome::Bypassed(value, reason));
        }

        let key = self.keys.build_key(request);
        debug!(key = %key, "Derived response cache key");

        if let Some(value) = self.cache.get::<V>(&key).await {
            record_cache_lookup(CacheLookup::Hit);
            return Ok(CacheOutcome::Hit(value));
        }

        record_cache_lookup(CacheLookup::Miss);
        let value = downstream().await?;

        let ttl = self.gate.config().resolve_ttl(request.route());
        self.cache.set(&key, &value, ttl).await;

        Ok(CacheOutcome::Miss(value))
    }

    /// Drops the entry `request` would be served from
    pub async fn invalidate(&self, request: &CacheRequest) {
        if !self.gate.config().enabled {
            return;
        }

        let key = self.keys.build_key(request);
        self.cache.invalidate(&key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::domain::CallerIdentity;
    use crate::domain::cache::{MockCache, RoutePolicy};

    const ROUTE: &str = "/v1/quizzes/{quiz_id}/analysis";

    fn request() -> CacheRequest {
        CacheRequest::get("/v1/quizzes/q-1/analysis")
            .with_route(ROUTE)
            .with_path_param("quiz_id", "q-1")
            .with_identity(CallerIdentity::user("user-1"))
    }

    fn interceptor(backend: Arc<MockCache>, config: ResponseCacheConfig) -> CacheInterceptor {
        CacheInterceptor::new(backend, config)
    }

    async fn run(
        interceptor: &CacheInterceptor,
        request: &CacheRequest,
        calls: &AtomicUsize,
        value: u32,
    ) -> Result<CacheOutcome<u32>, String> {
        interceptor
            .intercept(request, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(value)
            })
            .await
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        let first = run(&interceptor, &request(), &calls, 7).await.unwrap();
        let second = run(&interceptor, &request(), &calls, 8).await.unwrap();

        assert_eq!(first, CacheOutcome::Miss(7));
        assert_eq!(second, CacheOutcome::Hit(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.keys(), vec![r#"user-1:/v1/quizzes/q-1/analysis:{"quiz_id":"q-1"}"#]);
    }

    #[tokio::test]
    async fn test_default_ttl_applied() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        run(&interceptor, &request(), &calls, 1).await.unwrap();

        let key = backend.keys().remove(0);
        assert_eq!(backend.stored_ttl(&key), Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_route_ttl_override_applied() {
        let backend = Arc::new(MockCache::new());
        let config = ResponseCacheConfig::default().with_route(ROUTE, RoutePolicy::ttl(300));
        let interceptor = interceptor(backend.clone(), config);
        let calls = AtomicUsize::new(0);

        run(&interceptor, &request(), &calls, 1).await.unwrap();

        let key = backend.keys().remove(0);
        assert_eq!(backend.stored_ttl(&key), Some(Duration::from_secs(300)));
    }

    #[tokio::test]
    async fn test_bypass_skips_cache() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        let request = CacheRequest::new("POST", "/v1/quizzes/generate");
        let outcome = run(&interceptor, &request, &calls, 3).await.unwrap();

        assert_eq!(
            outcome,
            CacheOutcome::Bypassed(3, BypassReason::NonReadMethod("POST".to_string()))
        );
        assert_eq!(outcome.label(), "BYPASS");
        assert_eq!(backend.get_calls(), 0);
        assert_eq!(backend.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_failing_get_still_runs_downstream() {
        let backend = Arc::new(MockCache::new().with_get_error("connection refused"));
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        let outcome = run(&interceptor, &request(), &calls, 42).await.unwrap();

        assert_eq!(outcome, CacheOutcome::Miss(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_set_still_returns_value() {
        let backend = Arc::new(MockCache::new().with_error("connection refused"));
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        let outcome = run(&interceptor, &request(), &calls, 42).await.unwrap();

        assert_eq!(outcome.into_value(), 42);
        assert_eq!(backend.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_downstream_error_propagates_and_is_not_stored() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());

        let result: Result<CacheOutcome<u32>, String> = interceptor
            .intercept(&request(), || async { Err("quiz not found".to_string()) })
            .await;

        assert_eq!(result, Err("quiz not found".to_string()));
        assert_eq!(backend.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        run(&interceptor, &request(), &calls, 1).await.unwrap();
        interceptor.invalidate(&request()).await;
        let outcome = run(&interceptor, &request(), &calls, 2).await.unwrap();

        assert_eq!(outcome, CacheOutcome::Miss(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_callers_do_not_share_entries() {
        let backend = Arc::new(MockCache::new());
        let interceptor = interceptor(backend.clone(), ResponseCacheConfig::default());
        let calls = AtomicUsize::new(0);

        run(&interceptor, &request(), &calls, 1).await.unwrap();
        let other = request().with_identity(CallerIdentity::Anonymous);
        let outcome = run(&interceptor, &other, &calls, 2).await.unwrap();

        assert_eq!(outcome, CacheOutcome::Miss(2));
        assert_eq!(backend.keys().len(), 2);
    }
}
