use std::sync::Arc;

use uuid::Uuid;

use practice_backend::{
    dto::question_dto::GenerateQuestionRequest,
    error::{Error, Result},
    models::question_template::{AnswerComposer, ParamSet, ParameterRule, QuestionKind, QuestionTemplate},
    services::{
        attempt_store::{AttemptStore, InMemoryAttemptStore},
        generator_service::GeneratorService,
        template_store::InMemoryTemplateStore,
    },
};

#[derive(Debug)]
struct Echo;

impl AnswerComposer for Echo {
    fn correct_answer(&self, params: &ParamSet) -> Result<String> {
        Ok(params["n"].to_string())
    }
}

fn request() -> GenerateQuestionRequest {
    GenerateQuestionRequest {
        kind: QuestionKind::Coding,
        difficulty: "easy".to_string(),
        language: "sql".to_string(),
    }
}

fn service_with(rule: ParameterRule, attempts: Arc<InMemoryAttemptStore>) -> GeneratorService {
    let template = QuestionTemplate::new(
        "select-constant",
        QuestionKind::Coding,
        "easy",
        "sql",
        "Write a query that returns {{n}}.",
        Echo,
    )
    .with_code("SELECT {{n}};")
    .with_param("n", rule);
    GeneratorService::new(Arc::new(InMemoryTemplateStore::new(vec![template])), attempts)
}

#[tokio::test]
async fn concurrent_requests_never_share_a_fingerprint() {
    let attempts = Arc::new(InMemoryAttemptStore::new());
    let service = service_with(ParameterRule::range(7, 7), attempts.clone());
    let user = Uuid::new_v4();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.generate_question_instance(user, &request()).await })
        })
        .collect();

    let mut served = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(instance) => {
                served += 1;
                assert_eq!(instance.question.prompt, "Write a query that returns 7.");
                assert_eq!(instance.question.code_snippet.as_deref(), Some("SELECT 7;"));
            }
            Err(Error::GenerationExhausted { .. }) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }
    assert_eq!(served, 1);
}

#[tokio::test]
async fn small_parameter_space_is_served_exactly_once_per_value() {
    let attempts = Arc::new(InMemoryAttemptStore::new());
    let service = service_with(ParameterRule::list([1, 2]), attempts.clone()).with_seed(12);
    let user = Uuid::new_v4();

    let mut answers = Vec::new();
    for _ in 0..6 {
        match service.generate_question_instance(user, &request()).await {
            Ok(instance) => {
                assert!(attempts.has_fingerprint(user, &instance.fingerprint).await.unwrap());
                answers.push(instance.question.correct_answer);
            }
            Err(Error::GenerationExhausted { .. }) => {}
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }
    answers.sort();
    answers.dedup();
    assert!(answers.len() <= 2);
    assert!(!answers.is_empty());
}

#[tokio::test]
async fn default_time_limit_applies_without_override() {
    let service = service_with(ParameterRule::range(1, 100), Arc::new(InMemoryAttemptStore::new()));
    let instance = service
        .generate_question_instance(Uuid::new_v4(), &request())
        .await
        .unwrap();
    assert_eq!(instance.question.time_limit_seconds, 900);
    assert_eq!(instance.kind, QuestionKind::Coding);
    assert_eq!(instance.difficulty, "easy");
    assert_eq!(instance.language, "sql");
}
