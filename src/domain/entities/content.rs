use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Closed set of content formats served by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    /// Short-form content (reels format)
    Short,
    Audio,
    Text,
    Image,
    Mixed,
}

/// A unit of consumable material.
///
/// `embedding` is either absent or has exactly the provider's fixed
/// dimensionality: it is only ever set from a successful provider response.
/// Content without an embedding never enters a semantic ranking pool.
///
/// `view_count` and `consumption_count` are counters owned by the repository:
/// they are only moved forward through its atomic increment operations.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub source_url: Option<String>,
    pub transcript: Option<String>,
    pub raw_text: Option<String>,
    pub summary: Option<String>,
    pub duration_seconds: Option<f64>,
    pub tags: Vec<String>,
    pub metadata: JsonValue,
    #[serde(skip_serializing)]
    pub embedding: Option<Vec<f32>>,
    pub view_count: u64,
    /// Popularity counter, incremented once per consumption record
    pub consumption_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Content {
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }

    /// Projects the content into its agent-consumable shape.
    ///
    /// `relevance_score` is only set by semantic lookups (1 - cosine distance).
    pub fn to_agent_view(&self, relevance_score: Option<f32>) -> ContentAgentView {
        ContentAgentView {
            id: self.id,
            content_type: self.content_type,
            title: self.title.clone(),
            description: self.description.clone(),
            transcript: self.transcript.clone(),
            raw_text: self.raw_text.clone(),
            summary: self.summary.clone(),
            duration_seconds: self.duration_seconds,
            tags: self.tags.clone(),
            metadata: self.metadata.clone(),
            created_at: self.created_at,
            relevance_score,
        }
    }
}

/// View of a content optimized for agent consumption: full text fields,
/// no counters, no storage details.
#[derive(Debug, Clone, Serialize)]
pub struct ContentAgentView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub description: Option<String>,
    pub transcript: Option<String>,
    pub raw_text: Option<String>,
    pub summary: Option<String>,
    pub duration_seconds: Option<f64>,
    pub tags: Vec<String>,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub relevance_score: Option<f32>,
}
