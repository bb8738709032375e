use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::history_dto::HistoryQuery;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_history(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .history
        .list_attempts(user_id, query.page, query.limit)
        .await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn history_summary(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let summary = state.history.summary(user_id).await?;
    Ok(Json(summary))
}

#[axum::debug_handler]
pub async fn get_history_attempt(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let attempt = state.history.get_attempt(user_id, attempt_id).await?;
    Ok(Json(attempt))
}
