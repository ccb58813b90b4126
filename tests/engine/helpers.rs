use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use content_feed_service::domain::entities::content::{Content, ContentType};
use content_feed_service::domain::services::ranking::TRENDING_BIAS;
use content_feed_service::ports::content_repository::ContentRepository;
use content_feed_service::ports::embedding_provider::{
    EmbeddingProvider, EmbeddingProviderError,
};
use content_feed_service::repositories::in_memory_agent_repository::InMemoryAgentRepository;
use content_feed_service::repositories::in_memory_content_repository::InMemoryContentRepository;

pub const TEST_DIMENSIONS: usize = 4;

/// Embedding provider with canned vectors: deterministic and offline.
/// Unknown texts report the provider as unavailable.
pub struct FakeEmbeddingProvider {
    vectors: HashMap<String, Vec<f32>>,
}

impl FakeEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            vectors: HashMap::new(),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingProviderError> {
        Ok(self.vectors.get(text).cloned())
    }

    fn dimensions(&self) -> usize {
        TEST_DIMENSIONS
    }
}

/// Embedding provider that always fails, to exercise the degraded paths.
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> Result<Option<Vec<f32>>, EmbeddingProviderError> {
        Err(EmbeddingProviderError::RequestFailed(
            "the provider is down".to_string(),
        ))
    }

    fn dimensions(&self) -> usize {
        TEST_DIMENSIONS
    }
}

pub fn repositories() -> (Arc<InMemoryContentRepository>, Arc<InMemoryAgentRepository>) {
    (
        Arc::new(InMemoryContentRepository::new()),
        Arc::new(InMemoryAgentRepository::new()),
    )
}

/// Stores a content aged by `age_hours`, optionally embedded.
pub async fn seed_content(
    repository: &Arc<InMemoryContentRepository>,
    title: &str,
    content_type: ContentType,
    embedding: Option<Vec<f32>>,
    age_hours: i64,
) -> Content {
    let content = Content {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        content_type,
        source_url: None,
        transcript: None,
        raw_text: None,
        summary: None,
        duration_seconds: None,
        tags: vec![],
        metadata: serde_json::Value::Null,
        embedding,
        view_count: 0,
        consumption_count: 0,
        created_at: Utc::now() - Duration::hours(age_hours),
    };

    repository
        .insert(content.clone())
        .await
        .expect("Failed to seed content");

    content
}

/// Smallest seed whose first draw lands on the wanted side of the default
/// strategy's coin flip.
pub fn seed_forcing_trending(want_trending: bool) -> u64 {
    (0..)
        .find(|seed| StdRng::seed_from_u64(*seed).gen_bool(TRENDING_BIAS) == want_trending)
        .unwrap()
}
