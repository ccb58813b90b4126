use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::agent::Agent;
use crate::domain::entities::content::{Content, ContentType};
use crate::domain::entities::feed::{FeedItem, FeedPage, FeedRationale};
use crate::domain::services::cursor;
use crate::domain::services::pagination::paginate;
use crate::domain::services::ranking::RankingStrategy;
use crate::helper::error_chain_fmt;
use crate::ports::agent_repository::{AgentRepository, AgentRepositoryError};
use crate::ports::content_repository::{
    ContentFilter, ContentRepository, ContentRepositoryError, ScanOrder,
};

pub const MAX_PAGE_SIZE: usize = 50;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_SHORTS_PAGE_SIZE: usize = 20;

/// Parameters of one personalized feed request.
#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub agent_id: Option<Uuid>,
    pub cursor: Option<String>,
    pub limit: usize,
    pub content_type: Option<ContentType>,
    pub exclude_consumed: bool,
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            agent_id: None,
            cursor: None,
            limit: DEFAULT_PAGE_SIZE,
            content_type: None,
            exclude_consumed: true,
        }
    }
}

/// The feed generation engine: resolves the exclusion set, picks a ranking
/// strategy, orders the candidate pool and cuts the requested page out of it.
///
/// Every public operation is read-only against the repositories. Randomness
/// (the default-strategy coin flip, the discovery shuffle) comes from the
/// caller, one source per request.
pub struct GenerateFeedUseCase {
    content_repository: Arc<dyn ContentRepository>,
    agent_repository: Arc<dyn AgentRepository>,
}

impl GenerateFeedUseCase {
    pub fn new(
        content_repository: Arc<dyn ContentRepository>,
        agent_repository: Arc<dyn AgentRepository>,
    ) -> Self {
        Self {
            content_repository,
            agent_repository,
        }
    }

    /// Personalized feed: semantic ranking when the agent has a preference
    /// vector, the popularity/recency coin flip otherwise.
    ///
    /// An unknown `agent_id` is served as an anonymous request rather than
    /// rejected.
    #[tracing::instrument(name = "Generating personalized feed", skip(self, rng))]
    pub async fn feed<R: Rng + ?Sized>(
        &self,
        request: FeedRequest,
        rng: &mut R,
    ) -> Result<FeedPage, GenerateFeedError> {
        let offset = cursor::decode(request.cursor.as_deref());
        let limit = request.limit.clamp(1, MAX_PAGE_SIZE);

        let agent = self.resolve_agent(request.agent_id).await?;
        let exclude_ids = self
            .exclusion_set(agent.as_ref().map(|agent| agent.id), request.exclude_consumed)
            .await?;

        let strategy = RankingStrategy::for_personalized_feed(agent.as_ref(), rng);
        info!(strategy = ?strategy.kind(), "Selected ranking strategy");

        self.assemble_page(strategy, request.content_type, exclude_ids, offset, limit, rng)
            .await
    }

    /// Short-form only feed: a personalized feed with the content type pinned.
    pub async fn shorts<R: Rng + ?Sized>(
        &self,
        agent_id: Option<Uuid>,
        cursor: Option<String>,
        limit: usize,
        rng: &mut R,
    ) -> Result<FeedPage, GenerateFeedError> {
        self.feed(
            FeedRequest {
                agent_id,
                cursor,
                limit,
                content_type: Some(ContentType::Short),
                exclude_consumed: true,
            },
            rng,
        )
        .await
    }

    /// Pure popularity ranking. No personalization: agent identity plays no
    /// role here, nothing is excluded.
    #[tracing::instrument(name = "Generating trending feed", skip(self, rng))]
    pub async fn trending<R: Rng + ?Sized>(
        &self,
        cursor: Option<String>,
        limit: usize,
        rng: &mut R,
    ) -> Result<FeedPage, GenerateFeedError> {
        let offset = cursor::decode(cursor.as_deref());
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        self.assemble_page(
            RankingStrategy::Trending,
            None,
            HashSet::new(),
            offset,
            limit,
            rng,
        )
        .await
    }

    /// Uniformly shuffled pool, to surface content a popularity or similarity
    /// ordering would bury. Known agents never see what they already consumed.
    #[tracing::instrument(name = "Generating discovery feed", skip(self, rng))]
    pub async fn discover<R: Rng + ?Sized>(
        &self,
        agent_id: Option<Uuid>,
        cursor: Option<String>,
        limit: usize,
        rng: &mut R,
    ) -> Result<FeedPage, GenerateFeedError> {
        let offset = cursor::decode(cursor.as_deref());
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        let exclude_ids = self.exclusion_set(agent_id, true).await?;

        self.assemble_page(
            RankingStrategy::Discovery,
            None,
            exclude_ids,
            offset,
            limit,
            rng,
        )
        .await
    }

    async fn resolve_agent(
        &self,
        agent_id: Option<Uuid>,
    ) -> Result<Option<Agent>, GenerateFeedError> {
        match agent_id {
            Some(agent_id) => Ok(self.agent_repository.get(agent_id).await?),
            None => Ok(None),
        }
    }

    /// Content ids to remove from the candidate pool before ranking: empty
    /// for anonymous requests or when exclusion is off, the agent's whole
    /// consumption set otherwise.
    async fn exclusion_set(
        &self,
        agent_id: Option<Uuid>,
        exclude_consumed: bool,
    ) -> Result<HashSet<Uuid>, GenerateFeedError> {
        match agent_id {
            Some(agent_id) if exclude_consumed => {
                Ok(self.agent_repository.consumed_content_ids(agent_id).await?)
            }
            _ => Ok(HashSet::new()),
        }
    }

    /// Orders the filtered pool with `strategy` and cuts the
    /// `[offset, offset + limit)` page out of it.
    async fn assemble_page<R: Rng + ?Sized>(
        &self,
        strategy: RankingStrategy,
        content_type: Option<ContentType>,
        exclude_ids: HashSet<Uuid>,
        offset: usize,
        limit: usize,
        rng: &mut R,
    ) -> Result<FeedPage, GenerateFeedError> {
        let filter = ContentFilter {
            content_type,
            exclude_ids,
            with_embedding_only: matches!(strategy, RankingStrategy::Semantic { .. }),
        };

        // Ranked prefix deep enough to cut the requested page
        let depth = offset + limit;

        let ranked: Vec<(Content, Option<f32>)> = match &strategy {
            RankingStrategy::Semantic { preference_vector } => self
                .content_repository
                .nearest(preference_vector, &filter, depth)
                .await?
                .into_iter()
                .map(|(content, distance)| (content, Some(1.0 - distance)))
                .collect(),
            RankingStrategy::Trending => self
                .content_repository
                .scan(&filter, ScanOrder::PopularityDesc, Some(depth))
                .await?
                .into_iter()
                .map(|content| (content, None))
                .collect(),
            RankingStrategy::Recency => self
                .content_repository
                .scan(&filter, ScanOrder::CreatedAtDesc, Some(depth))
                .await?
                .into_iter()
                .map(|content| (content, None))
                .collect(),
            RankingStrategy::Discovery => {
                // The whole pool is shuffled: a page is a window into this
                // request's permutation, not a stable global ordering
                let mut pool = self
                    .content_repository
                    .scan(&filter, ScanOrder::Insertion, None)
                    .await?;
                pool.shuffle(rng);

                pool.into_iter().map(|content| (content, None)).collect()
            }
        };

        // Counted against the same filtered, excluded pool the cursor walks
        let total_available = self.content_repository.count(&filter).await?;

        let feed_id = Uuid::new_v4();
        let strategy_kind = strategy.kind();

        let page = paginate(ranked, offset, limit);
        let items = page
            .items
            .into_iter()
            .enumerate()
            .map(|(index, (content, relevance_score))| FeedItem {
                content: content.to_agent_view(relevance_score),
                position: offset + index,
                rationale: FeedRationale {
                    strategy: strategy_kind,
                    feed_session: feed_id,
                },
            })
            .collect();

        Ok(FeedPage {
            items,
            next_cursor: page.next_cursor,
            total_available,
            feed_id,
        })
    }
}

#[derive(thiserror::Error)]
pub enum GenerateFeedError {
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
    #[error(transparent)]
    AgentRepositoryError(#[from] AgentRepositoryError),
}

impl std::fmt::Debug for GenerateFeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
