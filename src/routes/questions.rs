use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::dto::question_dto::{GenerateQuestionRequest, NextQuestionResponse, SubmitAnswerRequest};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: std::result::Result<Json<GenerateQuestionRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;
    let instance = state.generator.generate_question_instance(user_id, &req).await?;
    let body = serde_json::to_value(NextQuestionResponse {
        question_instance_id: instance.question_instance_id,
        question: instance.public_view(),
    })?;
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: std::result::Result<Json<SubmitAnswerRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;
    req.validate()?;
    let result = state.submissions.submit(user_id, req).await?;
    Ok(Json(result))
}
