//! Decides whether a request goes through the response cache

use std::fmt;

use super::policy::ResponseCacheConfig;
use super::request::CacheRequest;

/// Why a request skips the response cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassReason {
    /// Response caching is switched off
    Disabled,
    /// Only GET responses are cached
    NonReadMethod(String),
    /// The route is configured with `skip_cache`
    RouteSkipped(String),
    /// The resolved TTL is zero
    ZeroTtl,
    /// A denylisted query parameter is present
    DenylistedParam(String),
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "response cache disabled"),
            Self::NonReadMethod(method) => write!(f, "method {} is not cacheable", method),
            Self::RouteSkipped(route) => write!(f, "route {} is marked no-cache", route),
            Self::ZeroTtl => write!(f, "resolved ttl is zero"),
            Self::DenylistedParam(param) => write!(f, "query parameter '{}' is denylisted", param),
        }
    }
}

/// Pure bypass decision over request metadata and static configuration
#[derive(Debug, Clone)]
pub struct CacheGate {
    config: ResponseCacheConfig,
}

impl CacheGate {
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResponseCacheConfig {
        &self.config
    }

    /// Returns true when the cache must not be used for this request
    pub fn should_bypass(&self, request: &CacheRequest) -> bool {
        self.bypass_reason(request).is_some()
    }

    /// Returns the first reason the request bypasses the cache, if any
    pub fn bypass_reason(&self, request: &CacheRequest) -> Option<BypassReason> {
        if !self.config.enabled {
            return Some(BypassReason::Disabled);
        }

        if !request.is_read() {
            return Some(BypassReason::NonReadMethod(request.method().to_uppercase()));
        }

        if let Some(policy) = self.config.route_policy(request.route()) {
            if policy.skip_cache {
                let route = request.route().unwrap_or_default().to_string();
                return Some(BypassReason::RouteSkipped(route));
            }
        }

        if self.config.resolve_ttl(request.route()).is_zero() {
            return Some(BypassReason::ZeroTtl);
        }

        self.config
            .denylisted_params
            .iter()
            .find(|param| request.has_query_param(param))
            .map(|param| BypassReason::DenylistedParam(param.clone()))
    }
}
