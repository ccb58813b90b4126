use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::helper::error_chain_fmt;

/// One consumption event, append-only: a record is never mutated after it has
/// been created. Every record drives exactly one popularity increment on the
/// referenced content and one increment of the agent's own totals.
#[derive(Debug, Clone, Serialize)]
pub struct ConsumptionRecord {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub content_id: Uuid,
    pub consumed_at: DateTime<Utc>,
    pub watch_duration_seconds: Option<f64>,
    /// 0 to 100
    pub completion_percentage: f64,
    /// 1 to 5
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub learned_concepts: Vec<String>,
}

impl ConsumptionRecord {
    /// Validates the consumption details and stamps the record.
    pub fn new(
        agent_id: Uuid,
        content_id: Uuid,
        watch_duration_seconds: Option<f64>,
        completion_percentage: f64,
        rating: Option<u8>,
        feedback: Option<String>,
        learned_concepts: Vec<String>,
    ) -> Result<Self, ConsumptionRecordError> {
        if !(0.0..=100.0).contains(&completion_percentage) {
            return Err(ConsumptionRecordError::InvalidCompletionPercentage(
                completion_percentage,
            ));
        }

        if let Some(rating) = rating {
            if !(1..=5).contains(&rating) {
                return Err(ConsumptionRecordError::InvalidRating(rating));
            }
        }

        if let Some(duration) = watch_duration_seconds {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ConsumptionRecordError::InvalidWatchDuration(duration));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            agent_id,
            content_id,
            consumed_at: Utc::now(),
            watch_duration_seconds,
            completion_percentage,
            rating,
            feedback,
            learned_concepts,
        })
    }
}

#[derive(thiserror::Error)]
pub enum ConsumptionRecordError {
    #[error("Completion percentage must be within 0 and 100, got {0}")]
    InvalidCompletionPercentage(f64),
    #[error("Rating must be within 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("Watch duration must be a non-negative number of seconds, got {0}")]
    InvalidWatchDuration(f64),
}

impl std::fmt::Debug for ConsumptionRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
