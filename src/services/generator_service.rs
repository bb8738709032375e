use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::dto::question_dto::GenerateQuestionRequest;
use crate::error::{Error, Result};
use crate::models::question_attempt::NewGeneratedAttempt;
use crate::models::question_instance::{QuestionInstance, RenderedQuestion};
use crate::models::question_template::QuestionTemplate;
use crate::services::attempt_store::AttemptStore;
use crate::services::param_service::generate_params;
use crate::services::render_service::render;
use crate::services::template_store::TemplateStore;
use crate::services::uniqueness_service::{compute_fingerprint, resolve_time_limit};

pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// One rendered candidate, not yet checked against the user's history.
struct Candidate {
    fingerprint: String,
    question: RenderedQuestion,
}

#[derive(Clone)]
pub struct GeneratorService {
    templates: Arc<dyn TemplateStore>,
    attempts: Arc<dyn AttemptStore>,
    rng: Arc<Mutex<StdRng>>,
    persist_generated: bool,
}

impl GeneratorService {
    pub fn new(templates: Arc<dyn TemplateStore>, attempts: Arc<dyn AttemptStore>) -> Self {
        Self {
            templates,
            attempts,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
            persist_generated: true,
        }
    }

    /// Replaces the entropy-seeded source with a deterministic one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn with_persistence(mut self, persist_generated: bool) -> Self {
        self.persist_generated = persist_generated;
        self
    }

    fn lock_rng(&self) -> Result<std::sync::MutexGuard<'_, StdRng>> {
        self.rng
            .lock()
            .map_err(|_| Error::Internal("random source mutex poisoned".to_string()))
    }

    pub async fn generate_question_instance(
        &self,
        user_id: Uuid,
        request: &GenerateQuestionRequest,
    ) -> Result<QuestionInstance> {
        let template = self.select_template(request).await?;
        let time_limit_seconds = resolve_time_limit(&template);

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let candidate = {
                let mut rng = self.lock_rng()?;
                build_candidate(&template, time_limit_seconds, &mut *rng)?
            };

            if self
                .attempts
                .has_fingerprint(user_id, &candidate.fingerprint)
                .await?
            {
                tracing::debug!(
                    template_id = %template.id,
                    attempt,
                    "fingerprint already served to user, regenerating"
                );
                continue;
            }

            let question_instance_id = if self.persist_generated {
                let created = self
                    .attempts
                    .create_generated_attempt(NewGeneratedAttempt {
                        user_id,
                        template_id: template.id.clone(),
                        fingerprint: candidate.fingerprint.clone(),
                        kind: template.kind,
                        difficulty: template.difficulty.clone(),
                        language: template.language.clone(),
                        question: candidate.question.clone(),
                    })
                    .await?;
                match created {
                    Some(record) => record.id,
                    None => {
                        tracing::debug!(
                            template_id = %template.id,
                            attempt,
                            "fingerprint recorded concurrently, regenerating"
                        );
                        continue;
                    }
                }
            } else {
                Uuid::new_v4()
            };

            tracing::info!(
                %user_id,
                %question_instance_id,
                template_id = %template.id,
                attempt,
                "generated question instance"
            );

            return Ok(QuestionInstance {
                question_instance_id,
                template_id: template.id.clone(),
                fingerprint: candidate.fingerprint,
                kind: template.kind,
                difficulty: template.difficulty.clone(),
                language: template.language.clone(),
                question: candidate.question,
            });
        }

        Err(Error::GenerationExhausted {
            template_id: template.id.clone(),
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    async fn select_template(&self, request: &GenerateQuestionRequest) -> Result<Arc<QuestionTemplate>> {
        let mut matching = self
            .templates
            .find_matching(request.kind, &request.difficulty, &request.language)
            .await?;
        if matching.is_empty() {
            return Err(Error::NoTemplateAvailable {
                kind: request.kind.to_string(),
                difficulty: request.difficulty.clone(),
                language: request.language.clone(),
            });
        }
        let index = self.lock_rng()?.gen_range(0..matching.len());
        Ok(matching.swap_remove(index))
    }
}

fn build_candidate(
    template: &QuestionTemplate,
    time_limit_seconds: u32,
    rng: &mut StdRng,
) -> Result<Candidate> {
    let params = generate_params(&template.parameters, rng)?;
    let prompt = render(&template.prompt_template, &params);
    let code_snippet = template
        .code_template
        .as_deref()
        .map(|code| render(code, &params));
    let correct_answer = template.composer.correct_answer(&params)?;
    let choices = template.composer.choices(&params, &correct_answer, rng)?;
    let explanation = template.composer.explanation(&params, &correct_answer);
    let fingerprint = compute_fingerprint(&template.id, &params)?;

    Ok(Candidate {
        fingerprint,
        question: RenderedQuestion {
            prompt,
            code_snippet,
            params,
            correct_answer,
            choices,
            explanation,
            time_limit_seconds,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question_attempt::{AttemptRecord, SubmittedAnswer};
    use crate::models::question_template::{AnswerComposer, ParamSet, ParameterRule, QuestionKind};
    use crate::services::attempt_store::InMemoryAttemptStore;
    use crate::services::template_catalog::builtin_templates;
    use crate::services::template_store::InMemoryTemplateStore;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::always;
    use std::collections::HashSet;

    mock! {
        pub Attempts {}

        #[async_trait]
        impl AttemptStore for Attempts {
            async fn has_fingerprint(&self, user_id: Uuid, fingerprint: &str) -> Result<bool>;
            async fn create_generated_attempt(
                &self,
                attempt: NewGeneratedAttempt,
            ) -> Result<Option<AttemptRecord>>;
            async fn find_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<Option<AttemptRecord>>;
            async fn mark_submitted(
                &self,
                attempt_id: Uuid,
                answer: SubmittedAnswer,
            ) -> Result<Option<AttemptRecord>>;
            async fn list_submitted(&self, user_id: Uuid) -> Result<Vec<AttemptRecord>>;
        }
    }

    #[derive(Debug)]
    struct Constant;

    impl AnswerComposer for Constant {
        fn correct_answer(&self, params: &ParamSet) -> Result<String> {
            Ok(params.get("n").map(|v| v.to_string()).unwrap_or_default())
        }
    }

    fn request(kind: QuestionKind, difficulty: &str, language: &str) -> GenerateQuestionRequest {
        GenerateQuestionRequest {
            kind,
            difficulty: difficulty.to_string(),
            language: language.to_string(),
        }
    }

    fn catalog_service(seed: u64) -> GeneratorService {
        GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(builtin_templates())),
            Arc::new(InMemoryAttemptStore::new()),
        )
        .with_seed(seed)
    }

    fn single_combination_service() -> GeneratorService {
        let template = QuestionTemplate::new(
            "fixed",
            QuestionKind::Coding,
            "easy",
            "sql",
            "Return {{n}}.",
            Constant,
        )
        .with_param("n", ParameterRule::range(3, 3));
        GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(vec![template])),
            Arc::new(InMemoryAttemptStore::new()),
        )
        .with_seed(1)
    }

    #[tokio::test]
    async fn code_output_sum_scenario() {
        let service = catalog_service(17);
        let instance = service
            .generate_question_instance(
                Uuid::new_v4(),
                &request(QuestionKind::CodeOutput, "easy", "javascript"),
            )
            .await
            .unwrap();

        assert_eq!(instance.template_id, "code-output-sum");
        let a = instance.question.params["a"].as_i64().unwrap();
        let b = instance.question.params["b"].as_i64().unwrap();
        assert!((1..=9).contains(&a) && (1..=9).contains(&b));
        assert_eq!(instance.question.correct_answer, (a + b).to_string());

        let choices = instance.question.choices.as_ref().unwrap();
        assert_eq!(choices.len(), 4);
        assert_eq!(
            choices.iter().filter(|c| **c == instance.question.correct_answer).count(),
            1
        );
        assert_eq!(instance.question.time_limit_seconds, 240);
        assert_eq!(
            instance.question.code_snippet.as_deref(),
            Some(format!("const result = {} + {};\nconsole.log(result);", a, b).as_str())
        );
    }

    #[tokio::test]
    async fn never_serves_the_same_fingerprint_twice() {
        let service = catalog_service(99);
        let user = Uuid::new_v4();
        let req = request(QuestionKind::CodeOutput, "easy", "javascript");
        let mut seen = HashSet::new();
        for _ in 0..30 {
            match service.generate_question_instance(user, &req).await {
                Ok(instance) => assert!(seen.insert(instance.fingerprint)),
                Err(Error::GenerationExhausted { .. }) => {}
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
        assert!(!seen.is_empty());
    }

    #[tokio::test]
    async fn single_combination_exhausts_on_second_call() {
        let service = single_combination_service();
        let user = Uuid::new_v4();
        let req = request(QuestionKind::Coding, "easy", "sql");

        let first = service.generate_question_instance(user, &req).await.unwrap();
        assert_eq!(first.question.prompt, "Return 3.");

        match service.generate_question_instance(user, &req).await {
            Err(Error::GenerationExhausted { template_id, attempts }) => {
                assert_eq!(template_id, "fixed");
                assert_eq!(attempts, MAX_GENERATION_ATTEMPTS);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }

        let other_user = service
            .generate_question_instance(Uuid::new_v4(), &req)
            .await
            .unwrap();
        assert_eq!(other_user.fingerprint, first.fingerprint);
    }

    #[tokio::test]
    async fn unmatched_request_has_no_template() {
        let service = catalog_service(3);
        let result = service
            .generate_question_instance(
                Uuid::new_v4(),
                &request(QuestionKind::Coding, "hard", "cpp"),
            )
            .await;
        assert!(matches!(result, Err(Error::NoTemplateAvailable { .. })));
    }

    #[tokio::test]
    async fn disabled_persistence_mints_fresh_ids() {
        let mut attempts = MockAttempts::new();
        attempts.expect_has_fingerprint().returning(|_, _| Ok(false));
        attempts.expect_create_generated_attempt().never();

        let service = GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(builtin_templates())),
            Arc::new(attempts),
        )
        .with_seed(5)
        .with_persistence(false);

        let instance = service
            .generate_question_instance(
                Uuid::new_v4(),
                &request(QuestionKind::Coding, "medium", "javascript"),
            )
            .await
            .unwrap();
        assert_eq!(instance.template_id, "coding-two-sum");
        assert!(instance.question.choices.is_none());
        assert_eq!(instance.question.time_limit_seconds, 1200);
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let mut attempts = MockAttempts::new();
        attempts
            .expect_has_fingerprint()
            .with(always(), always())
            .times(1)
            .returning(|_, _| Err(Error::Internal("store offline".to_string())));

        let service = GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(builtin_templates())),
            Arc::new(attempts),
        )
        .with_seed(5);

        let result = service
            .generate_question_instance(
                Uuid::new_v4(),
                &request(QuestionKind::CodeOutput, "easy", "javascript"),
            )
            .await;
        match result {
            Err(Error::Internal(msg)) => assert_eq!(msg, "store offline"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn lost_conditional_write_consumes_an_attempt() {
        let mut attempts = MockAttempts::new();
        attempts.expect_has_fingerprint().returning(|_, _| Ok(false));
        attempts
            .expect_create_generated_attempt()
            .times(MAX_GENERATION_ATTEMPTS)
            .returning(|_| Ok(None));

        let service = GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(builtin_templates())),
            Arc::new(attempts),
        )
        .with_seed(5);

        let result = service
            .generate_question_instance(
                Uuid::new_v4(),
                &request(QuestionKind::CodeOutput, "easy", "javascript"),
            )
            .await;
        assert!(matches!(result, Err(Error::GenerationExhausted { .. })));
    }

    #[tokio::test]
    async fn invalid_rules_are_not_retried() {
        let template = QuestionTemplate::new(
            "broken",
            QuestionKind::Coding,
            "easy",
            "sql",
            "{{n}}",
            Constant,
        )
        .with_param("n", ParameterRule::List { values: vec![] });

        let mut attempts = MockAttempts::new();
        attempts.expect_has_fingerprint().never();

        let service = GeneratorService::new(
            Arc::new(InMemoryTemplateStore::new(vec![template])),
            Arc::new(attempts),
        );
        let result = service
            .generate_question_instance(Uuid::new_v4(), &request(QuestionKind::Coding, "easy", "sql"))
            .await;
        assert!(matches!(result, Err(Error::InvalidRule(_))));
    }
}
