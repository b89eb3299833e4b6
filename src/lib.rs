//! Quiz Platform API
//!
//! Quiz generation and performance analysis over HTTP, with a fail-open
//! response cache in front of the read endpoints:
//! - Per-caller cache keys derived from path and canonicalized parameters
//! - In-memory (moka) or Redis cache backends
//! - Request validation that reports every violated field at once

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use infrastructure::auth::{JwtConfig, JwtVerifier};
use infrastructure::cache::CacheFactory;
use infrastructure::quiz::{InMemoryAnalysisRepository, QuestionBankQuizGenerator};
use infrastructure::response_cache::CacheInterceptor;
use infrastructure::services::QuizService;

/// Create the application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = CacheFactory::new().create(&config.cache).await?;
    info!(backend = %config.cache.backend, "Cache backend ready");

    let generator = match &config.quiz.question_bank_path {
        Some(path) => QuestionBankQuizGenerator::from_file(path).await?,
        None => {
            warn!("No question bank configured; quiz generation will find no questions");
            QuestionBankQuizGenerator::default()
        }
    };

    let quiz_service = QuizService::new(
        Arc::new(generator),
        Arc::new(InMemoryAnalysisRepository::new()),
    );
    let response_cache = CacheInterceptor::new(backend, config.response_cache.clone());

    let mut state = AppState::new(Arc::new(quiz_service), Arc::new(response_cache));

    match &config.auth.jwt_secret {
        Some(secret) => {
            let mut jwt_config = JwtConfig::new(secret.clone());

            if let Some(issuer) = &config.auth.issuer {
                jwt_config = jwt_config.with_issuer(issuer.clone());
            }

            state = state.with_jwt_verifier(JwtVerifier::new(&jwt_config));
        }
        None => warn!("No JWT secret configured; all callers are anonymous"),
    }

    Ok(state)
}
