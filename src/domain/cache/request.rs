//! Framework-neutral view of an incoming request for caching decisions

use crate::domain::identity::CallerIdentity;

/// The parts of an HTTP request that drive cache bypass and key derivation
#[derive(Debug, Clone, Default)]
pub struct CacheRequest {
    method: String,
    path: String,
    route: Option<String>,
    query: Vec<(String, String)>,
    path_params: Vec<(String, String)>,
    identity: CallerIdentity,
}

impl CacheRequest {
    /// Creates a request view for the given method and originally requested path
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Shorthand for a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    /// Sets the matched route template (e.g. `/v1/quizzes/{quiz_id}/analysis`)
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Appends a query parameter; repeated names are kept in order
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Replaces all query parameters
    pub fn with_query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    /// Appends a path parameter
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn with_identity(mut self, identity: CallerIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn path_params(&self) -> &[(String, String)] {
        &self.path_params
    }

    pub fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    /// Whether the method is a read (GET)
    pub fn is_read(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Whether the query string carries a parameter with the given name
    pub fn has_query_param(&self, name: &str) -> bool {
        self.query.iter().any(|(k, _)| k == name)
    }
}
