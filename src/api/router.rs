use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    caching_middleware, identity_middleware, logging_middleware, metrics_middleware,
};
use super::state::AppState;
use super::v1;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    let v1_router = v1::create_v1_router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        caching_middleware,
    ));

    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/v1", v1_router)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, identity_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
