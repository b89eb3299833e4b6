//! Caller identification from optional JWT bearer tokens

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::domain::CallerIdentity;

/// Resolves the caller and stores it in the request extensions
///
/// Requests without a valid token continue as [`CallerIdentity::Anonymous`].
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = match &state.jwt_verifier {
        Some(verifier) => verifier.resolve(extract_bearer_token(request.headers()).as_deref()),
        None => CallerIdentity::Anonymous,
    };

    debug!(caller = %identity, "Resolved caller identity");
    request.extensions_mut().insert(identity);

    next.run(request).await
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Extractor for the caller resolved by [`identity_middleware`]
#[derive(Debug, Clone, Default)]
pub struct Caller(pub CallerIdentity);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller(caller_identity(&parts.extensions)))
    }
}

pub(crate) fn caller_identity(extensions: &axum::http::Extensions) -> CallerIdentity {
    extensions
        .get::<CallerIdentity>()
        .cloned()
        .unwrap_or_default()
}
