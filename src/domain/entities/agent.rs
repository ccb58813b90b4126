use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A registered automated consumer.
///
/// `preference_embedding` is computed once at registration from the declared
/// interests, and only when the embedding provider was available at that
/// moment. It is never recomputed afterwards; agents without one fall back to
/// the default ranking strategy on every feed request.
#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Free-form family tag, e.g. "claude", "gpt-4", "custom"
    pub agent_type: Option<String>,
    pub interests: Vec<String>,
    #[serde(skip_serializing)]
    pub preference_embedding: Option<Vec<f32>>,
    pub total_content_consumed: u64,
    pub total_watch_time_seconds: f64,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Agent {
    pub fn has_preference_vector(&self) -> bool {
        self.preference_embedding.is_some()
    }
}
