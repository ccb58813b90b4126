use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::entities::consumption::{ConsumptionRecord, ConsumptionRecordError};
use crate::helper::error_chain_fmt;
use crate::ports::agent_repository::{AgentRepository, AgentRepositoryError};
use crate::ports::content_repository::{ContentRepository, ContentRepositoryError};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct LogConsumptionRequest {
    pub content_id: Uuid,
    pub watch_duration_seconds: Option<f64>,
    pub completion_percentage: f64,
    pub rating: Option<u8>,
    pub feedback: Option<String>,
    pub learned_concepts: Vec<String>,
}

/// Records that an agent consumed a content, and maintains the counters that
/// consumption drives.
pub struct LogConsumptionUseCase {
    content_repository: Arc<dyn ContentRepository>,
    agent_repository: Arc<dyn AgentRepository>,
}

impl LogConsumptionUseCase {
    pub fn new(
        content_repository: Arc<dyn ContentRepository>,
        agent_repository: Arc<dyn AgentRepository>,
    ) -> Self {
        Self {
            content_repository,
            agent_repository,
        }
    }

    /// Appends exactly one consumption record, then bumps the agent's totals
    /// and the content's popularity counter.
    ///
    /// The increments are atomic add-N operations at the repository boundary:
    /// M concurrent calls against the same content move its popularity by
    /// exactly M.
    #[tracing::instrument(name = "Logging consumption", skip(self, request), fields(content_id = %request.content_id))]
    pub async fn execute(
        &self,
        agent_id: Uuid,
        request: LogConsumptionRequest,
    ) -> Result<ConsumptionRecord, LogConsumptionError> {
        self.agent_repository
            .get(agent_id)
            .await?
            .ok_or(LogConsumptionError::AgentNotFound(agent_id))?;

        self.content_repository
            .get(request.content_id)
            .await?
            .ok_or(LogConsumptionError::ContentNotFound(request.content_id))?;

        let record = ConsumptionRecord::new(
            agent_id,
            request.content_id,
            request.watch_duration_seconds,
            request.completion_percentage,
            request.rating,
            request.feedback,
            request.learned_concepts,
        )?;

        self.agent_repository
            .append_consumption(record.clone())
            .await?;
        self.agent_repository
            .add_consumption_totals(agent_id, record.watch_duration_seconds.unwrap_or(0.0))
            .await?;
        self.content_repository
            .add_consumptions(record.content_id, 1)
            .await?;

        info!(record_id = %record.id, "Logged consumption");

        Ok(record)
    }

    /// The agent's consumption records, most recent first.
    #[tracing::instrument(name = "Fetching consumption history", skip(self))]
    pub async fn history(
        &self,
        agent_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConsumptionRecord>, LogConsumptionError> {
        self.agent_repository
            .get(agent_id)
            .await?
            .ok_or(LogConsumptionError::AgentNotFound(agent_id))?;

        Ok(self
            .agent_repository
            .consumption_history(agent_id, limit)
            .await?)
    }
}

#[derive(thiserror::Error)]
pub enum LogConsumptionError {
    #[error("Agent {0} does not exist")]
    AgentNotFound(Uuid),
    #[error("Content {0} does not exist")]
    ContentNotFound(Uuid),
    #[error(transparent)]
    InvalidRecord(#[from] ConsumptionRecordError),
    #[error(transparent)]
    AgentRepositoryError(#[from] AgentRepositoryError),
    #[error(transparent)]
    ContentRepositoryError(#[from] ContentRepositoryError),
}

impl std::fmt::Debug for LogConsumptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
