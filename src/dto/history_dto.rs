use serde::{Deserialize, Serialize};

use crate::models::question_attempt::AttemptRecord;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedAttempts {
    pub attempts: Vec<AttemptRecord>,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySegment {
    pub label: String,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub total_attempts: usize,
    pub accuracy_per_difficulty: Vec<AccuracySegment>,
    pub accuracy_by_type: Vec<AccuracySegment>,
}
