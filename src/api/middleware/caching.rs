//! HTTP response caching middleware
//!
//! Must be installed with `route_layer` so the matched route and path
//! parameters are known. Only successful UTF-8 responses are stored.

use axum::{
    body::{Body, to_bytes},
    extract::{
        MatchedPath, OriginalUri, Query, RawPathParams, Request, State,
        rejection::RawPathParamsRejection,
    },
    http::{HeaderValue, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::identity::caller_identity;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::cache::CacheRequest;

/// Response header reporting `HIT`, `MISS` or `BYPASS`
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Largest response body that is buffered for caching
pub const MAX_CACHED_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Stored form of a successful response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub body: String,
}

impl IntoResponse for CachedResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let mut response = (status, self.body).into_response();

        if let Some(value) = self
            .content_type
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }

        response
    }
}

/// Serves cacheable requests through the state's cache interceptor
pub async fn caching_middleware(
    State(state): State<AppState>,
    matched_path: Option<MatchedPath>,
    path_params: Result<RawPathParams, RawPathParamsRejection>,
    request: Request,
    next: Next,
) -> Response {
    let cache_request = build_cache_request(&request, matched_path.as_ref(), path_params.ok());

    let result = state
        .response_cache
        .intercept(&cache_request, || async move {
            into_cacheable(next.run(request).await).await
        })
        .await;

    match result {
        Ok(outcome) => {
            let label = outcome.label();
            let mut response = outcome.into_value().into_response();
            response
                .headers_mut()
                .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(label));
            response
        }
        Err(response) => response,
    }
}

fn build_cache_request(
    request: &Request,
    matched_path: Option<&MatchedPath>,
    path_params: Option<RawPathParams>,
) -> CacheRequest {
    let uri = original_uri(request);

    let mut cache_request = CacheRequest::new(request.method().as_str(), uri.path())
        .with_query_pairs(query_pairs(&uri))
        .with_identity(caller_identity(request.extensions()));

    if let Some(route) = matched_path {
        cache_request = cache_request.with_route(route.as_str());
    }

    for (name, value) in path_params.iter().flat_map(|p| p.iter()) {
        cache_request = cache_request.with_path_param(name, value);
    }

    cache_request
}

/// Full request URI, before any `nest` prefix stripping
fn original_uri(request: &Request) -> Uri {
    request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.clone())
        .unwrap_or_else(|| request.uri().clone())
}

fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default()
}

/// Buffers a successful response; anything else is passed through untouched
async fn into_cacheable(response: Response) -> Result<CachedResponse, Response> {
    if !response.status().is_success() {
        return Err(response);
    }

    let (parts, body) = response.into_parts();

    let bytes = match to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "Failed to buffer response body");
            return Err(ApiError::internal("Failed to read response body").into_response());
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match String::from_utf8(bytes.to_vec()) {
        Ok(body) => Ok(CachedResponse {
            status: parts.status.as_u16(),
            content_type,
            body,
        }),
        Err(_) => Err(Response::from_parts(parts, Body::from(bytes))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::Method;

    #[test]
    fn test_query_pairs_keep_repeats() {
        let uri: Uri = "/v1/topics?tag=a&tag=b&mainTopicId=math".parse().unwrap();

        assert_eq!(
            query_pairs(&uri),
            vec![
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
                ("mainTopicId".to_string(), "math".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_decoded() {
        let uri: Uri = "/v1/topics?mainTopicId=linear%20algebra".parse().unwrap();
        assert_eq!(query_pairs(&uri)[0].1, "linear algebra");
    }

    #[test]
    fn test_build_cache_request_uses_original_uri() {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri("/topics?mainTopicId=math")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(OriginalUri(
            "/v1/topics?mainTopicId=math".parse().unwrap(),
        ));

        let cache_request = build_cache_request(&request, None, None);

        assert_eq!(cache_request.path(), "/v1/topics");
        assert!(cache_request.has_query_param("mainTopicId"));
        assert!(cache_request.identity().is_anonymous());
    }

    #[tokio::test]
    async fn test_error_responses_are_not_cacheable() {
        let response = ApiError::not_found("missing").into_response();

        let result = into_cacheable(response).await;
        assert_eq!(result.unwrap_err().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cached_response_round_trip() {
        let response = Json(serde_json::json!({"ok": true})).into_response();

        let cached = into_cacheable(response).await.unwrap();
        assert_eq!(cached.status, 200);
        assert_eq!(cached.content_type.as_deref(), Some("application/json"));

        let rebuilt = cached.clone().into_response();
        assert_eq!(rebuilt.status(), StatusCode::OK);
        assert_eq!(
            rebuilt.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = to_bytes(rebuilt.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, cached.body.as_bytes());
    }
}
