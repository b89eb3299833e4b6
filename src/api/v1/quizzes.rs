//! Quiz generation and analysis endpoints

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::CallerIdentity;
use crate::domain::cache::CacheRequest;
use crate::domain::quiz::{
    GeneratedQuiz, QuizAnalysisResult, RawQuizAnalysis, RawQuizGenerationRequest,
};

/// Route template of the per-quiz analysis resource
pub const ANALYSIS_ROUTE: &str = "/v1/quizzes/{quiz_id}/analysis";

/// The cached `GET` of a caller's analysis.
///
/// `path` is the request path as sent, still percent-encoded, matching the
/// path the caching layer keys the `GET` under.
fn analysis_cache_request(caller: &CallerIdentity, path: &str, quiz_id: &str) -> CacheRequest {
    CacheRequest::get(path)
        .with_route(ANALYSIS_ROUTE)
        .with_path_param("quiz_id", quiz_id)
        .with_identity(caller.clone())
}

/// POST /v1/quizzes/generate
pub async fn generate_quiz(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(request): Json<RawQuizGenerationRequest>,
) -> Result<Json<GeneratedQuiz>, ApiError> {
    let quiz = state.quiz_service.generate(&caller, request).await?;

    Ok(Json(quiz))
}

/// POST /v1/quizzes/:quiz_id/analysis
pub async fn submit_analysis(
    State(state): State<AppState>,
    Caller(caller): Caller,
    OriginalUri(uri): OriginalUri,
    Path(quiz_id): Path<String>,
    Json(submission): Json<RawQuizAnalysis>,
) -> Result<(StatusCode, Json<QuizAnalysisResult>), ApiError> {
    let result = state
        .quiz_service
        .submit_analysis(&caller, &quiz_id, submission)
        .await?;

    state
        .response_cache
        .invalidate(&analysis_cache_request(&caller, uri.path(), &quiz_id))
        .await;

    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /v1/quizzes/:quiz_id/analysis
pub async fn get_analysis(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(quiz_id): Path<String>,
) -> Result<Json<QuizAnalysisResult>, ApiError> {
    debug!(quiz_id = %quiz_id, "Getting analysis");

    let result = state.quiz_service.get_analysis(&caller, &quiz_id).await?;

    Ok(Json(result))
}
