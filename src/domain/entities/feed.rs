use serde::Serialize;
use uuid::Uuid;

use super::content::ContentAgentView;
use crate::domain::services::ranking::StrategyKind;

/// Why an item ended up in a page: the strategy that ranked it and the
/// request-scoped feed session it belongs to. Observability only, no ranking
/// semantics.
#[derive(Debug, Clone, Serialize)]
pub struct FeedRationale {
    pub strategy: StrategyKind,
    pub feed_session: Uuid,
}

#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub content: ContentAgentView,
    /// Absolute rank of the item in the candidate sequence, not its index
    /// within the page
    pub position: usize,
    pub rationale: FeedRationale,
}

/// One page of a feed. Transient: nothing here is persisted.
#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    /// Present iff the page came back full, i.e. more items may exist
    pub next_cursor: Option<String>,
    /// Size of the filtered, exclusion-applied candidate pool
    pub total_available: usize,
    /// Fresh for every request, shared by all items of the page
    pub feed_id: Uuid,
}
