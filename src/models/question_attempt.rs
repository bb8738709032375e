use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::question_instance::RenderedQuestion;
use crate::models::question_template::QuestionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Generated,
    Submitted,
}

impl TryFrom<String> for AttemptStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "generated" => Ok(AttemptStatus::Generated),
            "submitted" => Ok(AttemptStatus::Submitted),
            other => Err(format!("unknown attempt status `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttemptRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_id: String,
    #[serde(skip_serializing)]
    pub fingerprint: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub kind: QuestionKind,
    pub difficulty: String,
    pub language: String,
    pub question_snapshot: Json<RenderedQuestion>,
    #[sqlx(try_from = "String")]
    pub status: AttemptStatus,
    pub user_answer: Option<String>,
    pub correct: Option<bool>,
    pub time_taken_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewGeneratedAttempt {
    pub user_id: Uuid,
    pub template_id: String,
    pub fingerprint: String,
    pub kind: QuestionKind,
    pub difficulty: String,
    pub language: String,
    pub question: RenderedQuestion,
}

#[derive(Debug, Clone)]
pub struct SubmittedAnswer {
    pub user_answer: String,
    pub correct: bool,
    pub time_taken_seconds: Option<i32>,
}

impl AttemptRecord {
    pub fn generated(new: NewGeneratedAttempt) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            template_id: new.template_id,
            fingerprint: new.fingerprint,
            kind: new.kind,
            difficulty: new.difficulty,
            language: new.language,
            question_snapshot: Json(new.question),
            status: AttemptStatus::Generated,
            user_answer: None,
            correct: None,
            time_taken_seconds: None,
            created_at: Utc::now(),
            submitted_at: None,
        }
    }

    /// Applies the one-way `generated -> submitted` transition. Returns false
    /// when the attempt was already submitted.
    pub fn submit(&mut self, answer: SubmittedAnswer) -> bool {
        if self.status == AttemptStatus::Submitted {
            return false;
        }
        self.status = AttemptStatus::Submitted;
        self.user_answer = Some(answer.user_answer);
        self.correct = Some(answer.correct);
        self.time_taken_seconds = answer.time_taken_seconds;
        self.submitted_at = Some(Utc::now());
        true
    }
}
