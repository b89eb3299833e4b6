//! Response cache configuration and per-route policies

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

/// Per-route cache settings, keyed by route template in [`ResponseCacheConfig::routes`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutePolicy {
    /// TTL override for this route, in seconds
    #[serde(default)]
    pub ttl_secs: Option<u64>,
    /// Never cache responses of this route
    #[serde(default)]
    pub skip_cache: bool,
}

impl RoutePolicy {
    /// A policy that overrides the TTL
    pub fn ttl(secs: u64) -> Self {
        Self {
            ttl_secs: Some(secs),
            skip_cache: false,
        }
    }

    /// A policy that disables caching for the route
    pub fn skip() -> Self {
        Self {
            ttl_secs: None,
            skip_cache: true,
        }
    }
}

/// Configuration of the HTTP response cache
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseCacheConfig {
    /// Global switch; when false every request bypasses the cache
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// TTL applied when a route has no override
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// Query parameters that mark a request as paginated or non-deterministic
    #[serde(default = "default_denylisted_params")]
    pub denylisted_params: Vec<String>,
    /// Per-route overrides keyed by route template
    #[serde(default)]
    pub routes: HashMap<String, RoutePolicy>,
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_denylisted_params() -> Vec<String> {
    vec!["page".to_string(), "limit".to_string(), "random".to_string()]
}

impl Default for ResponseCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: default_ttl_secs(),
            denylisted_params: default_denylisted_params(),
            routes: HashMap::new(),
        }
    }
}

impl ResponseCacheConfig {
    /// Sets the default TTL
    pub fn with_default_ttl(mut self, secs: u64) -> Self {
        self.default_ttl_secs = secs;
        self
    }

    /// Replaces the denylisted query parameters
    pub fn with_denylisted_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denylisted_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Registers a policy for a route template
    pub fn with_route(mut self, route: impl Into<String>, policy: RoutePolicy) -> Self {
        self.routes.insert(route.into(), policy);
        self
    }

    /// Disables response caching
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Looks up the policy for a route template
    pub fn route_policy(&self, route: Option<&str>) -> Option<&RoutePolicy> {
        route.and_then(|r| self.routes.get(r))
    }

    /// Route override first, then the global default
    pub fn resolve_ttl(&self, route: Option<&str>) -> Duration {
        let secs = self
            .route_policy(route)
            .and_then(|p| p.ttl_secs)
            .unwrap_or(self.default_ttl_secs);

        Duration::from_secs(secs)
    }
}
