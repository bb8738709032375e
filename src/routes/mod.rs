pub mod health;
pub mod history;
pub mod questions;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{auth::require_user, rate_limit};
use crate::AppState;

/// Full HTTP surface: `/health` plus the authenticated question and history
/// APIs behind a per-router rate limit.
pub fn app_router(state: AppState, public_rps: u32) -> Router {
    let practice_api = Router::new()
        .route("/api/questions/next", post(questions::next_question))
        .route("/api/questions/submit", post(questions::submit_answer))
        .route("/api/history", get(history::list_history))
        .route("/api/history/summary", get(history::history_summary))
        .route("/api/history/:id", get(history::get_history_attempt))
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_user))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(public_rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(practice_api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
