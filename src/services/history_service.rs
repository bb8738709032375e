use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::dto::history_dto::{AccuracySegment, PaginatedAttempts, UserSummary};
use crate::error::{Error, Result};
use crate::models::question_attempt::{AttemptRecord, AttemptStatus};
use crate::services::attempt_store::AttemptStore;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct HistoryService {
    attempts: Arc<dyn AttemptStore>,
}

impl HistoryService {
    pub fn new(attempts: Arc<dyn AttemptStore>) -> Self {
        Self { attempts }
    }

    pub async fn list_attempts(
        &self,
        user_id: Uuid,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PaginatedAttempts> {
        let page = page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let attempts = self.attempts.list_submitted(user_id).await?;
        let total_items = attempts.len() as i64;
        let total_pages = (total_items / limit + i64::from(total_items % limit != 0)).max(1);
        let start = ((page - 1).saturating_mul(limit)).min(total_items) as usize;

        Ok(PaginatedAttempts {
            attempts: attempts.into_iter().skip(start).take(limit as usize).collect(),
            page,
            limit,
            total_pages,
            total_items,
        })
    }

    pub async fn get_attempt(&self, user_id: Uuid, attempt_id: Uuid) -> Result<AttemptRecord> {
        self.attempts
            .find_attempt(user_id, attempt_id)
            .await?
            .filter(|a| a.status == AttemptStatus::Submitted)
            .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))
    }

    pub async fn summary(&self, user_id: Uuid) -> Result<UserSummary> {
        let attempts = self.attempts.list_submitted(user_id).await?;
        Ok(UserSummary {
            total_attempts: attempts.len(),
            accuracy_per_difficulty: accuracy_segments(&attempts, |a| a.difficulty.as_str()),
            accuracy_by_type: accuracy_segments(&attempts, |a| a.kind.as_str()),
        })
    }
}

/// Percentage of correct answers per label, rounded to the nearest integer.
fn accuracy_segments<F>(attempts: &[AttemptRecord], label_of: F) -> Vec<AccuracySegment>
where
    F: Fn(&AttemptRecord) -> &str,
{
    let mut buckets: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for attempt in attempts {
        let label = match label_of(attempt).trim() {
            "" => "Unknown",
            other => other,
        };
        let bucket = buckets.entry(label.to_string()).or_default();
        bucket.1 += 1;
        if attempt.correct == Some(true) {
            bucket.0 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(label, (correct, total))| AccuracySegment {
            label,
            accuracy: if total == 0 {
                0
            } else {
                (f64::from(correct) / f64::from(total) * 100.0).round() as u32
            },
        })
        .collect()
}
