use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::content::{Content, ContentAgentView, ContentType};
use crate::helper::error_chain_fmt;
use crate::ports::content_repository::{
    ContentFilter, ContentRepository, ContentRepositoryError, ScanOrder,
};

pub const MAX_LISTING_SIZE: usize = 100;
pub const DEFAULT_LISTING_SIZE: usize = 50;

/// Single-content lookup and plain recency-ordered listing.
pub struct ViewContentUseCase {
    content_repository: Arc<dyn ContentRepository>,
}

impl ViewContentUseCase {
    pub fn new(content_repository: Arc<dyn ContentRepository>) -> Self {
        Self { content_repository }
    }

    /// The content in its agent view. Each call counts as one view.
    #[tracing::instrument(name = "Fetching content", skip(self))]
    pub async fn get(&self, content_id: Uuid) -> Result<ContentAgentView, ViewContentError> {
        let content = self
            .content_repository
            .get(content_id)
            .await?
            .ok_or(ViewContentError::ContentNotFound(content_id))?;

        self.content_repository.add_views(content_id, 1).await?;

        Ok(content.to_agent_view(None))
    }

    /// Newest-first listing, offset/limit paginated.
    #[tracing::instrument(name = "Listing content", skip(self))]
    pub async fn list(
        &self,
        skip: usize,
        limit: usize,
        content_type: Option<ContentType>,
    ) -> Result<Vec<Content>, ViewContentError> {
        let limit = limit.clamp(1, MAX_LISTING_SIZE);

        let filter = ContentFilter {
            content_type,
            ..ContentFilter::default()
        };

        let listed = self
            .content_repository
            .scan(&filter, ScanOrder::CreatedAtDesc, Some(skip + limit))
            .await?;

        Ok(listed.into_iter().skip(skip).collect())
    }
}

#[derive(thiserror::Error)]
pub enum ViewContentError {
    #[error("Content {0} does not exist")]
    ContentNotFound(Uuid),
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
}

impl std::fmt::Debug for ViewContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
