use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::question_attempt::{AttemptRecord, NewGeneratedAttempt, SubmittedAnswer};
use crate::services::attempt_store::AttemptStore;

/// Postgres-backed attempt history. Uniqueness of (user_id, fingerprint) is
/// enforced by `question_attempts_user_fingerprint_idx`.
#[derive(Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn has_fingerprint(&self, user_id: Uuid, fingerprint: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS(SELECT 1 FROM question_attempts WHERE user_id = $1 AND fingerprint = $2)"#,
        )
        .bind(user_id)
        .bind(fingerprint)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create_generated_attempt(
        &self,
        attempt: NewGeneratedAttempt,
    ) -> Result<Option<AttemptRecord>> {
        let record = sqlx::query_as::<_, AttemptRecord>(
            r#"
            INSERT INTO question_attempts (
                id, user_id, template_id, fingerprint, kind, difficulty, language,
                question_snapshot, status, created_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, 'generated', $9
            )
            ON CONFLICT (user_id, fingerprint) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(attempt.user_id)
        .bind(attempt.template_id)
        .bind(attempt.fingerprint)
        .bind(attempt.kind.as_str())
        .bind(attempt.difficulty)
        .bind(attempt.language)
        .bind(Json(attempt.question))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<Option<AttemptRecord>> {
        let record = sqlx::query_as::<_, AttemptRecord>(
            r#"SELECT * FROM question_attempts WHERE id = $1 AND user_id = $2"#,
        )
        .bind(attempt_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn mark_submitted(
        &self,
        attempt_id: Uuid,
        answer: SubmittedAnswer,
    ) -> Result<Option<AttemptRecord>> {
        let record = sqlx::query_as::<_, AttemptRecord>(
            r#"
            UPDATE question_attempts
            SET status = 'submitted', user_answer = $2, correct = $3,
                time_taken_seconds = $4, submitted_at = $5
            WHERE id = $1 AND status = 'generated'
            RETURNING *
            "#,
        )
        .bind(attempt_id)
        .bind(answer.user_answer)
        .bind(answer.correct)
        .bind(answer.time_taken_seconds)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list_submitted(&self, user_id: Uuid) -> Result<Vec<AttemptRecord>> {
        let rows = sqlx::query_as::<_, AttemptRecord>(
            r#"
            SELECT * FROM question_attempts
            WHERE user_id = $1 AND status = 'submitted'
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
