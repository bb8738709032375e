use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question_template::{ParamSet, QuestionKind};

/// Rendered content of one question. Persisted verbatim as the attempt's
/// snapshot so submissions can be checked later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedQuestion {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub params: ParamSet,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub explanation: String,
    pub time_limit_seconds: u32,
}

/// Full internal representation, including the answer-checking secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionInstance {
    pub question_instance_id: Uuid,
    pub template_id: String,
    pub fingerprint: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub difficulty: String,
    pub language: String,
    #[serde(flatten)]
    pub question: RenderedQuestion,
}

/// What an end user may see while answering: no correct answer, fingerprint,
/// explanation or raw parameters.
#[derive(Debug, Serialize)]
pub struct PublicQuestion<'a> {
    pub question_instance_id: Uuid,
    pub template_id: &'a str,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub difficulty: &'a str,
    pub language: &'a str,
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<&'a [String]>,
    pub time_limit_seconds: u32,
}

impl QuestionInstance {
    pub fn public_view(&self) -> PublicQuestion<'_> {
        PublicQuestion {
            question_instance_id: self.question_instance_id,
            template_id: &self.template_id,
            kind: self.kind,
            difficulty: &self.difficulty,
            language: &self.language,
            prompt: &self.question.prompt,
            code_snippet: self.question.code_snippet.as_deref(),
            choices: self.question.choices.as_deref(),
            time_limit_seconds: self.question.time_limit_seconds,
        }
    }
}
