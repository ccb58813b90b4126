use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::content::{ContentAgentView, ContentType};
use crate::helper::error_chain_fmt;
use crate::ports::content_repository::{
    ContentFilter, ContentRepository, ContentRepositoryError,
};
use crate::ports::embedding_provider::EmbeddingProvider;
use crate::use_cases::view_content::MAX_LISTING_SIZE;

/// Free-text semantic search: embeds the query and ranks the embedded pool by
/// similarity to it.
pub struct SemanticSearchUseCase {
    content_repository: Arc<dyn ContentRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl SemanticSearchUseCase {
    pub fn new(
        content_repository: Arc<dyn ContentRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            content_repository,
            embedding_provider,
        }
    }

    /// Views of the `limit` closest contents, each carrying its similarity
    /// score (1 - cosine distance). Without a usable query embedding there is
    /// nothing to rank against: the result is empty, never an error.
    #[tracing::instrument(name = "Semantic search", skip(self))]
    pub async fn execute(
        &self,
        query: &str,
        limit: usize,
        content_type: Option<ContentType>,
    ) -> Result<Vec<ContentAgentView>, SemanticSearchError> {
        let limit = limit.clamp(1, MAX_LISTING_SIZE);

        let query_embedding = match self.embedding_provider.embed(query).await {
            Ok(Some(embedding)) => embedding,
            Ok(None) => return Ok(vec![]),
            Err(error) => {
                warn!(?error, "Embedding provider failed, returning no search results");
                return Ok(vec![]);
            }
        };

        let filter = ContentFilter {
            content_type,
            with_embedding_only: true,
            ..ContentFilter::default()
        };

        let hits = self
            .content_repository
            .nearest(&query_embedding, &filter, limit)
            .await?;

        Ok(hits
            .into_iter()
            .map(|(content, distance)| content.to_agent_view(Some(1.0 - distance)))
            .collect())
    }
}

#[derive(thiserror::Error)]
pub enum SemanticSearchError {
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
}

impl std::fmt::Debug for SemanticSearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
