//! Question bank topics endpoint

use axum::extract::{Query, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, TopicsQuery, TopicsResponse};

/// GET /v1/topics
pub async fn list_topics(
    State(state): State<AppState>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<TopicsResponse>, ApiError> {
    debug!(main_topic_id = ?query.main_topic_id, "Listing topics");

    let topics = state.quiz_service.topics(query.main_topic_id).await?;

    Ok(Json(TopicsResponse::new(topics)))
}
