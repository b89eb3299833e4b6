//! Cache backend selection from configuration

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::cache::Cache;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process moka cache
    #[default]
    InMemory,
    /// Shared Redis instance
    Redis,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackend::InMemory => write!(f, "in_memory"),
            CacheBackend::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for CacheBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "memory" => Ok(CacheBackend::InMemory),
            "redis" => Ok(CacheBackend::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// Key-value cache backend configuration (`[cache]` section)
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Required for the Redis backend
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// In-memory backend only
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_max_capacity() -> u64 {
    10_000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::InMemory,
            redis_url: None,
            key_prefix: None,
            max_capacity: default_max_capacity(),
        }
    }
}

impl CacheConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Creates cache backends
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates the backend selected by `config`
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config.backend {
            CacheBackend::InMemory => {
                let cache = InMemoryCache::with_config(
                    InMemoryCacheConfig::default().with_max_capacity(config.max_capacity),
                );
                Ok(Arc::new(cache))
            }
            CacheBackend::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis cache backend")
                })?;

                let mut redis_config = RedisCacheConfig::new(url);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let cache = RedisCache::new(redis_config).await?;
                Ok(Arc::new(cache))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cache_backend_from_str() {
        assert_eq!("in_memory".parse::<CacheBackend>().unwrap(), CacheBackend::InMemory);
        assert_eq!("memory".parse::<CacheBackend>().unwrap(), CacheBackend::InMemory);
        assert_eq!("REDIS".parse::<CacheBackend>().unwrap(), CacheBackend::Redis);
        assert!("memcached".parse::<CacheBackend>().is_err());
    }

    #[test]
    fn test_cache_config_deserialize() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"backend": "redis", "redis_url": "redis://cache:6379"}"#)
                .unwrap();

        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn test_factory_create_in_memory() {
        let cache = CacheFactory::new()
            .create(&CacheConfig::in_memory().with_max_capacity(100))
            .await
            .unwrap();

        cache
            .set_raw("test", "value", Duration::from_secs(60))
            .await
            .unwrap();

        let result = cache.get_raw("test").await.unwrap();
        assert_eq!(result, Some("value".to_string()));
    }

    #[tokio::test]
    async fn test_factory_create_redis_missing_url() {
        let config = CacheConfig {
            backend: CacheBackend::Redis,
            ..Default::default()
        };

        let result = CacheFactory::new().create(&config).await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
