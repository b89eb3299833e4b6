//! Cache key derivation for HTTP responses

use std::collections::BTreeMap;

use serde_json::Value;

use super::request::CacheRequest;

/// Derives deterministic cache keys of the form `{identity}:{path}:{sortedParamsJSON}`
///
/// Query and path parameters are merged into a single map whose keys are sorted
/// before serialization, so parameter order in the URL never changes the key.
/// A path parameter shadows a query parameter of the same name. Repeated query
/// parameters are kept as an array in order of appearance.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Creates a new key builder
    pub fn new() -> Self {
        Self
    }

    /// Builds the cache key for a request
    pub fn build_key(&self, request: &CacheRequest) -> String {
        let params = Self::canonical_params(request);
        let params_json = serde_json::to_string(&params).unwrap_or_else(|_| "{}".to_string());

        format!(
            "{}:{}:{}",
            request.identity().as_key_segment(),
            request.path(),
            params_json
        )
    }

    /// Merges query and path parameters into a sorted map
    pub fn canonical_params(request: &CacheRequest) -> BTreeMap<String, Value> {
        let mut params: BTreeMap<String, Value> = BTreeMap::new();

        for (name, value) in request.query() {
            match params.get_mut(name) {
                Some(Value::Array(values)) => values.push(Value::String(value.clone())),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value.clone())]);
                }
                None => {
                    params.insert(name.clone(), Value::String(value.clone()));
                }
            }
        }

        for (name, value) in request.path_params() {
            params.insert(name.clone(), Value::String(value.clone()));
        }

        params
    }
}
