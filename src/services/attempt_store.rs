use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::question_attempt::{
    AttemptRecord, AttemptStatus, NewGeneratedAttempt, SubmittedAnswer,
};

/// Persistence seam for attempt history. Implementations are the single
/// serialization point for the per-user fingerprint uniqueness invariant.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn has_fingerprint(&self, user_id: Uuid, fingerprint: &str) -> Result<bool>;

    /// Atomically records a generated attempt unless the user already has one
    /// with the same fingerprint, in which case `None` is returned.
    async fn create_generated_attempt(
        &self,
        attempt: NewGeneratedAttempt,
    ) -> Result<Option<AttemptRecord>>;

    async fn find_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<Option<AttemptRecord>>;

    /// Moves a `generated` attempt to `submitted`. `None` when no attempt in
    /// the `generated` state has that id.
    async fn mark_submitted(
        &self,
        attempt_id: Uuid,
        answer: SubmittedAnswer,
    ) -> Result<Option<AttemptRecord>>;

    /// Submitted attempts for a user, most recent submission first.
    async fn list_submitted(&self, user_id: Uuid) -> Result<Vec<AttemptRecord>>;
}

#[derive(Debug, Default)]
pub struct InMemoryAttemptStore {
    by_user: RwLock<HashMap<Uuid, Vec<AttemptRecord>>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn has_fingerprint(&self, user_id: Uuid, fingerprint: &str) -> Result<bool> {
        let guard = self.by_user.read().await;
        Ok(guard
            .get(&user_id)
            .map(|attempts| attempts.iter().any(|a| a.fingerprint == fingerprint))
            .unwrap_or(false))
    }

    async fn create_generated_attempt(
        &self,
        attempt: NewGeneratedAttempt,
    ) -> Result<Option<AttemptRecord>> {
        let mut guard = self.by_user.write().await;
        let attempts = guard.entry(attempt.user_id).or_default();
        if attempts.iter().any(|a| a.fingerprint == attempt.fingerprint) {
            return Ok(None);
        }
        let record = AttemptRecord::generated(attempt);
        attempts.push(record.clone());
        Ok(Some(record))
    }

    async fn find_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<Option<AttemptRecord>> {
        let guard = self.by_user.read().await;
        Ok(guard
            .get(&user_id)
            .and_then(|attempts| attempts.iter().find(|a| a.id == attempt_id))
            .cloned())
    }

    async fn mark_submitted(
        &self,
        attempt_id: Uuid,
        answer: SubmittedAnswer,
    ) -> Result<Option<AttemptRecord>> {
        let mut guard = self.by_user.write().await;
        let Some(attempt) = guard
            .values_mut()
            .flat_map(|attempts| attempts.iter_mut())
            .find(|a| a.id == attempt_id)
        else {
            return Ok(None);
        };
        if !attempt.submit(answer) {
            return Ok(None);
        }
        Ok(Some(attempt.clone()))
    }

    async fn list_submitted(&self, user_id: Uuid) -> Result<Vec<AttemptRecord>> {
        let guard = self.by_user.read().await;
        let mut submitted: Vec<AttemptRecord> = guard
            .get(&user_id)
            .map(|attempts| {
                attempts
                    .iter()
                    .filter(|a| a.status == AttemptStatus::Submitted)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        submitted.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(submitted)
    }
}
