use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::content::{Content, ContentType};
use crate::helper::error_chain_fmt;

/// Narrows a candidate pool before it is ranked or counted.
///
/// The exclusion set is part of the filter on purpose: excluded items are
/// removed before ranking, so they never eat into a page budget and never
/// inflate a pool count.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub content_type: Option<ContentType>,
    pub exclude_ids: HashSet<Uuid>,
    /// Restricts the pool to content that carries an embedding; semantic
    /// rankings always set this
    pub with_embedding_only: bool,
}

impl ContentFilter {
    pub fn matches(&self, content: &Content) -> bool {
        if let Some(content_type) = self.content_type {
            if content.content_type != content_type {
                return false;
            }
        }

        if self.exclude_ids.contains(&content.id) {
            return false;
        }

        if self.with_embedding_only && !content.has_embedding() {
            return false;
        }

        true
    }
}

/// Deterministic orderings a repository scan can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Descending popularity counter
    PopularityDesc,
    /// Descending creation timestamp
    CreatedAtDesc,
    /// The repository's natural (insertion) order
    Insertion,
}

/// Storage port for content.
///
/// The feed engine only ever talks to this interface; what actually holds the
/// rows is a deployment concern. Counter mutations are expressed as atomic
/// "add N" operations: implementations must guarantee that M concurrent adds
/// of 1 land as exactly +M, whatever the interleaving.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn insert(&self, content: Content) -> Result<(), ContentRepositoryError>;

    async fn get(&self, content_id: Uuid) -> Result<Option<Content>, ContentRepositoryError>;

    /// Candidates matching `filter`, ordered by `order` from rank 0, capped
    /// at `limit` items when one is given.
    async fn scan(
        &self,
        filter: &ContentFilter,
        order: ScanOrder,
        limit: Option<usize>,
    ) -> Result<Vec<Content>, ContentRepositoryError>;

    /// Size of the pool matching `filter`.
    async fn count(&self, filter: &ContentFilter) -> Result<usize, ContentRepositoryError>;

    /// The `k` candidates with the smallest cosine distance to `vector`,
    /// ascending, ties kept in natural order. Content without an embedding
    /// never matches, whatever the filter says.
    async fn nearest(
        &self,
        vector: &[f32],
        filter: &ContentFilter,
        k: usize,
    ) -> Result<Vec<(Content, f32)>, ContentRepositoryError>;

    async fn add_views(
        &self,
        content_id: Uuid,
        amount: u64,
    ) -> Result<(), ContentRepositoryError>;

    async fn add_consumptions(
        &self,
        content_id: Uuid,
        amount: u64,
    ) -> Result<(), ContentRepositoryError>;
}

#[derive(thiserror::Error)]
pub enum ContentRepositoryError {
    #[error("Content {0} does not exist")]
    UnknownContent(Uuid),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for ContentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
