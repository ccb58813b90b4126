use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::content::ContentAgentView;
use crate::helper::error_chain_fmt;
use crate::ports::content_repository::{
    ContentFilter, ContentRepository, ContentRepositoryError,
};
use crate::use_cases::generate_feed::MAX_PAGE_SIZE;

/// "More like this": nearest neighbors of one content's own embedding.
pub struct RelatedContentUseCase {
    content_repository: Arc<dyn ContentRepository>,
}

impl RelatedContentUseCase {
    pub fn new(content_repository: Arc<dyn ContentRepository>) -> Self {
        Self { content_repository }
    }

    /// At most `limit` contents closest to `content_id`, the content itself
    /// excluded from its own results.
    ///
    /// A content without an embedding has no measurable neighbors: the result
    /// is empty, not an error.
    #[tracing::instrument(name = "Looking up related content", skip(self))]
    pub async fn execute(
        &self,
        content_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ContentAgentView>, RelatedContentError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let content = self
            .content_repository
            .get(content_id)
            .await?
            .ok_or(RelatedContentError::ContentNotFound(content_id))?;

        let Some(embedding) = content.embedding else {
            return Ok(vec![]);
        };

        let filter = ContentFilter {
            content_type: None,
            exclude_ids: [content_id].into_iter().collect(),
            with_embedding_only: true,
        };

        let neighbors = self
            .content_repository
            .nearest(&embedding, &filter, limit)
            .await?;

        Ok(neighbors
            .into_iter()
            .map(|(content, distance)| content.to_agent_view(Some(1.0 - distance)))
            .collect())
    }
}

#[derive(thiserror::Error)]
pub enum RelatedContentError {
    #[error("Content {0} does not exist")]
    ContentNotFound(Uuid),
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
}

impl std::fmt::Debug for RelatedContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
