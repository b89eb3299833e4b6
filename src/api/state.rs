//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::JwtVerifier;
use crate::infrastructure::response_cache::CacheInterceptor;
use crate::infrastructure::services::QuizServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone, Debug)]
pub struct AppState {
    pub quiz_service: Arc<dyn QuizServiceTrait>,
    pub response_cache: Arc<CacheInterceptor>,
    /// Absent when no signing secret is configured; every caller is anonymous
    pub jwt_verifier: Option<Arc<JwtVerifier>>,
}

impl AppState {
    pub fn new(
        quiz_service: Arc<dyn QuizServiceTrait>,
        response_cache: Arc<CacheInterceptor>,
    ) -> Self {
        Self {
            quiz_service,
            response_cache,
            jwt_verifier: None,
        }
    }

    pub fn with_jwt_verifier(mut self, verifier: JwtVerifier) -> Self {
        self.jwt_verifier = Some(Arc::new(verifier));
        self
    }
}
