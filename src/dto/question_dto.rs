use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::question_instance::PublicQuestion;
use crate::models::question_template::QuestionKind;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQuestionRequest {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[validate(length(min = 1, message = "Difficulty is required"))]
    pub difficulty: String,
    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct NextQuestionResponse<'a> {
    pub question_instance_id: Uuid,
    pub question: PublicQuestion<'a>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_instance_id: Uuid,
    pub user_answer: String,
    #[validate(range(min = 0, message = "Time taken cannot be negative"))]
    pub time_taken_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}
