pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(handlers::handle_analyze_upload))
        .route("/api/v1/analyze/text", post(handlers::handle_analyze_text))
        // Skills API
        .route("/api/v1/skills/extract", post(handlers::handle_extract_skills))
        .route("/api/v1/skills/match", post(handlers::handle_match_skills))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
