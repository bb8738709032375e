use std::sync::Arc;

use uuid::Uuid;

use crate::dto::question_dto::{SubmitAnswerRequest, SubmitAnswerResponse};
use crate::error::{Error, Result};
use crate::models::question_attempt::{AttemptStatus, SubmittedAnswer};
use crate::services::attempt_store::AttemptStore;

pub fn normalize_answer(answer: &str) -> &str {
    answer.trim()
}

pub fn is_correct(user_answer: &str, correct_answer: &str) -> bool {
    normalize_answer(user_answer) == normalize_answer(correct_answer)
}

#[derive(Clone)]
pub struct SubmissionService {
    attempts: Arc<dyn AttemptStore>,
}

impl SubmissionService {
    pub fn new(attempts: Arc<dyn AttemptStore>) -> Self {
        Self { attempts }
    }

    pub async fn submit(&self, user_id: Uuid, req: SubmitAnswerRequest) -> Result<SubmitAnswerResponse> {
        let attempt = self
            .attempts
            .find_attempt(user_id, req.question_instance_id)
            .await?
            .ok_or_else(|| Error::NotFound("Question instance not found".to_string()))?;

        if attempt.status == AttemptStatus::Submitted {
            return Err(Error::Conflict(
                "Question instance has already been submitted".to_string(),
            ));
        }

        let snapshot = attempt.question_snapshot.0;
        let correct = is_correct(&req.user_answer, &snapshot.correct_answer);

        self.attempts
            .mark_submitted(
                attempt.id,
                SubmittedAnswer {
                    user_answer: req.user_answer,
                    correct,
                    time_taken_seconds: req.time_taken_seconds,
                },
            )
            .await?
            .ok_or_else(|| {
                Error::Conflict("Question instance has already been submitted".to_string())
            })?;

        tracing::info!(%user_id, attempt_id = %attempt.id, correct, "answer submitted");

        Ok(SubmitAnswerResponse {
            correct,
            correct_answer: snapshot.correct_answer,
            explanation: snapshot.explanation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question_attempt::NewGeneratedAttempt;
    use crate::models::question_instance::RenderedQuestion;
    use crate::models::question_template::{ParamSet, QuestionKind};
    use crate::services::attempt_store::InMemoryAttemptStore;

    async fn seeded(store: &InMemoryAttemptStore, user_id: Uuid) -> Uuid {
        store
            .create_generated_attempt(NewGeneratedAttempt {
                user_id,
                template_id: "code-output-sum".into(),
                fingerprint: "fp".into(),
                kind: QuestionKind::CodeOutput,
                difficulty: "easy".into(),
                language: "javascript".into(),
                question: RenderedQuestion {
                    prompt: "What does this print?".into(),
                    code_snippet: None,
                    params: ParamSet::new(),
                    correct_answer: " 7 ".into(),
                    choices: None,
                    explanation: "3 + 4 = 7".into(),
                    time_limit_seconds: 240,
                },
            })
            .await
            .unwrap()
            .unwrap()
            .id
    }

    fn request(id: Uuid, answer: &str) -> SubmitAnswerRequest {
        SubmitAnswerRequest {
            question_instance_id: id,
            user_answer: answer.to_string(),
            time_taken_seconds: Some(30),
        }
    }

    #[test]
    fn comparison_ignores_surrounding_whitespace_only() {
        assert!(is_correct("  7\n", "7"));
        assert!(!is_correct("7 0", "70"));
        assert!(!is_correct("Seven", "seven"));
    }

    #[tokio::test]
    async fn submit_checks_and_records_answer() {
        let store = Arc::new(InMemoryAttemptStore::new());
        let user = Uuid::new_v4();
        let id = seeded(&store, user).await;
        let service = SubmissionService::new(store.clone());

        let result = service.submit(user, request(id, "7")).await.unwrap();
        assert!(result.correct);
        assert_eq!(result.correct_answer, " 7 ");
        assert_eq!(result.explanation, "3 + 4 = 7");

        let stored = store.find_attempt(user, id).await.unwrap().unwrap();
        assert_eq!(stored.status, AttemptStatus::Submitted);
        assert_eq!(stored.correct, Some(true));
        assert_eq!(stored.time_taken_seconds, Some(30));
    }

    #[tokio::test]
    async fn second_submission_conflicts() {
        let store = Arc::new(InMemoryAttemptStore::new());
        let user = Uuid::new_v4();
        let id = seeded(&store, user).await;
        let service = SubmissionService::new(store);

        let first = service.submit(user, request(id, "8")).await.unwrap();
        assert!(!first.correct);
        assert!(matches!(
            service.submit(user, request(id, "7")).await,
            Err(Error::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn other_users_cannot_submit() {
        let store = Arc::new(InMemoryAttemptStore::new());
        let id = seeded(&store, Uuid::new_v4()).await;
        let service = SubmissionService::new(store);
        assert!(matches!(
            service.submit(Uuid::new_v4(), request(id, "7")).await,
            Err(Error::NotFound(_))
        ));
    }
}
