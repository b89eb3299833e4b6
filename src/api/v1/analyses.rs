//! Analysis history endpoint

use axum::extract::{Query, State};

use crate::api::middleware::Caller;
use crate::api::state::AppState;
use crate::api::types::{AnalysisListResponse, ApiError, Json, PageQuery};

/// GET /v1/analyses
pub async fn list_analyses(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<PageQuery>,
) -> Result<Json<AnalysisListResponse>, ApiError> {
    let (page, limit) = query.resolve().map_err(ApiError::validation_failed)?;

    let page = state
        .quiz_service
        .list_analyses(&caller, page, limit)
        .await?;

    Ok(Json(AnalysisListResponse::from(page)))
}
