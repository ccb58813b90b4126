use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::content::{Content, ContentType};
use crate::helper::error_chain_fmt;
use crate::ports::content_repository::{ContentRepository, ContentRepositoryError};
use crate::ports::embedding_provider::EmbeddingProvider;

#[derive(Debug, Clone)]
pub struct CreateContentRequest {
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
}

impl CreateContentRequest {
    /// Text handed to the embedding provider: title, description, raw text
    /// and tags, in that order.
    fn embedding_text(&self) -> String {
        let mut parts = vec![self.title.clone()];

        if let Some(description) = &self.description {
            parts.push(description.clone());
        }
        if let Some(raw_text) = &self.raw_text {
            parts.push(raw_text.clone());
        }
        if !self.tags.is_empty() {
            parts.push(self.tags.join(" "));
        }

        parts.join(" ")
    }
}

/// Stores a new content, embedding its text when the provider allows it.
pub struct CreateContentUseCase {
    content_repository: Arc<dyn ContentRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl CreateContentUseCase {
    pub fn new(
        content_repository: Arc<dyn ContentRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            content_repository,
            embedding_provider,
        }
    }

    #[tracing::instrument(name = "Creating content", skip(self, request), fields(title = %request.title))]
    pub async fn execute(
        &self,
        request: CreateContentRequest,
    ) -> Result<Content, CreateContentError> {
        if request.title.trim().is_empty() {
            return Err(CreateContentError::InvalidTitle);
        }

        // A failed embedding is not a failed creation: the content simply
        // stays out of semantic pools
        let embedding = match self.embedding_provider.embed(&request.embedding_text()).await {
            Ok(embedding) => embedding,
            Err(error) => {
                warn!(?error, "Embedding provider failed, storing content without embedding");
                None
            }
        };

        let content = Content {
            id: Uuid::new_v4(),
            title: request.title,
            description: request.description,
            content_type: request.content_type,
            source_url: request.source_url,
            transcript: request.transcript,
            raw_text: request.raw_text,
            summary: request.summary,
            duration_seconds: request.duration_seconds,
            tags: request.tags,
            metadata: request.metadata,
            embedding,
            view_count: 0,
            consumption_count: 0,
            created_at: Utc::now(),
        };

        self.content_repository.insert(content.clone()).await?;

        info!(
            content_id = %content.id,
            embedded = content.has_embedding(),
            "Created content"
        );

        Ok(content)
    }
}

#[derive(thiserror::Error)]
pub enum CreateContentError {
    #[error("Content title must not be empty")]
    InvalidTitle,
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
}

impl std::fmt::Debug for CreateContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
