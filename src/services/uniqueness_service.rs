use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::question_template::{ParamSet, QuestionTemplate};

pub const FALLBACK_TIME_LIMIT_SECONDS: u32 = 600;

const GENERIC_TIME_LIMIT_KIND: &str = "multiple-choice";

/// SHA-256 over the template id and the canonical (key-sorted) JSON of the
/// parameter set, hex encoded.
pub fn compute_fingerprint(template_id: &str, params: &ParamSet) -> Result<String> {
    let canonical = serde_json::to_string(params)?;
    let mut hasher = Sha256::new();
    hasher.update(template_id.as_bytes());
    hasher.update(b":");
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

fn default_time_limit(kind: &str, difficulty: &str) -> Option<u32> {
    let seconds = match (kind, difficulty) {
        ("code-output", "easy") => 300,
        ("code-output", "medium") => 600,
        ("code-output", "hard") => 900,
        ("coding", "easy") => 900,
        ("coding", "medium") => 1800,
        ("coding", "hard") => 2700,
        ("multiple-choice", "easy") => 180,
        ("multiple-choice", "medium") => 420,
        ("multiple-choice", "hard") => 600,
        _ => return None,
    };
    Some(seconds)
}

pub fn resolve_time_limit(template: &QuestionTemplate) -> u32 {
    if let Some(seconds) = template.time_limit_seconds.filter(|s| *s > 0) {
        return seconds;
    }
    default_time_limit(template.kind.as_str(), &template.difficulty)
        .or_else(|| default_time_limit(GENERIC_TIME_LIMIT_KIND, &template.difficulty))
        .unwrap_or(FALLBACK_TIME_LIMIT_SECONDS)
}
