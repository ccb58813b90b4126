use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::content::Content;
use crate::domain::services::similarity;
use crate::ports::content_repository::{
    ContentFilter, ContentRepository, ContentRepositoryError, ScanOrder,
};

/// Content repository held in process memory.
///
/// Counters live outside the stored `Content` as atomics, so increments are
/// single `fetch_add` operations under the shared read lock: concurrent
/// writers never read-then-write a counter.
struct ContentRow {
    content: Content,
    views: AtomicU64,
    consumptions: AtomicU64,
}

impl ContentRow {
    /// Materializes the row back into a `Content` with up-to-date counters
    fn snapshot(&self) -> Content {
        let mut content = self.content.clone();
        content.view_count = self.views.load(Ordering::Relaxed);
        content.consumption_count = self.consumptions.load(Ordering::Relaxed);
        content
    }
}

struct State {
    rows: HashMap<Uuid, Arc<ContentRow>>,
    /// Keeps the natural scan order deterministic
    insertion_order: Vec<Uuid>,
}

pub struct InMemoryContentRepository {
    state: RwLock<State>,
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                rows: HashMap::new(),
                insertion_order: Vec::new(),
            }),
        }
    }

    /// Matching rows as snapshots, in insertion order.
    fn matching_snapshots(&self, filter: &ContentFilter) -> Vec<Content> {
        let state = self.state.read().expect("content repository lock poisoned");

        state
            .insertion_order
            .iter()
            .filter_map(|id| state.rows.get(id))
            .map(|row| row.snapshot())
            .filter(|content| filter.matches(content))
            .collect()
    }

    fn row(&self, content_id: Uuid) -> Result<Arc<ContentRow>, ContentRepositoryError> {
        let state = self.state.read().expect("content repository lock poisoned");

        state
            .rows
            .get(&content_id)
            .cloned()
            .ok_or(ContentRepositoryError::UnknownContent(content_id))
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    #[tracing::instrument(name = "Saving content in memory", skip(self, content), fields(content_id = %content.id))]
    async fn insert(&self, content: Content) -> Result<(), ContentRepositoryError> {
        let mut state = self.state.write().expect("content repository lock poisoned");

        let id = content.id;
        let row = Arc::new(ContentRow {
            views: AtomicU64::new(content.view_count),
            consumptions: AtomicU64::new(content.consumption_count),
            content,
        });

        if state.rows.insert(id, row).is_none() {
            state.insertion_order.push(id);
        }

        Ok(())
    }

    async fn get(&self, content_id: Uuid) -> Result<Option<Content>, ContentRepositoryError> {
        let state = self.state.read().expect("content repository lock poisoned");

        Ok(state.rows.get(&content_id).map(|row| row.snapshot()))
    }

    #[tracing::instrument(name = "Scanning content in memory", skip(self, filter))]
    async fn scan(
        &self,
        filter: &ContentFilter,
        order: ScanOrder,
        limit: Option<usize>,
    ) -> Result<Vec<Content>, ContentRepositoryError> {
        let mut candidates = self.matching_snapshots(filter);

        // Stable sorts: equal keys keep the insertion order
        match order {
            ScanOrder::PopularityDesc => {
                candidates.sort_by(|a, b| b.consumption_count.cmp(&a.consumption_count));
            }
            ScanOrder::CreatedAtDesc => {
                candidates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            ScanOrder::Insertion => {}
        }

        if let Some(limit) = limit {
            candidates.truncate(limit);
        }

        Ok(candidates)
    }

    async fn count(&self, filter: &ContentFilter) -> Result<usize, ContentRepositoryError> {
        Ok(self.matching_snapshots(filter).len())
    }

    #[tracing::instrument(name = "Nearest-neighbor query in memory", skip(self, vector, filter))]
    async fn nearest(
        &self,
        vector: &[f32],
        filter: &ContentFilter,
        k: usize,
    ) -> Result<Vec<(Content, f32)>, ContentRepositoryError> {
        let pool = self.matching_snapshots(filter);

        Ok(similarity::k_nearest(vector, pool, k))
    }

    async fn add_views(
        &self,
        content_id: Uuid,
        amount: u64,
    ) -> Result<(), ContentRepositoryError> {
        let row = self.row(content_id)?;
        row.views.fetch_add(amount, Ordering::Relaxed);

        Ok(())
    }

    async fn add_consumptions(
        &self,
        content_id: Uuid,
        amount: u64,
    ) -> Result<(), ContentRepositoryError> {
        let row = self.row(content_id)?;
        row.consumptions.fetch_add(amount, Ordering::Relaxed);

        Ok(())
    }
}
