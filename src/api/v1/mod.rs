//! v1 quiz API endpoints

pub mod analyses;
pub mod quizzes;
pub mod topics;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/topics", get(topics::list_topics))
        .route("/quizzes/generate", post(quizzes::generate_quiz))
        .route(
            "/quizzes/{quiz_id}/analysis",
            get(quizzes::get_analysis).post(quizzes::submit_analysis),
        )
        .route("/analyses", get(analyses::list_analyses))
}
