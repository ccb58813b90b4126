use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::agent::Agent;
use crate::domain::entities::consumption::ConsumptionRecord;
use crate::helper::error_chain_fmt;

/// Storage port for agents and their consumption log.
///
/// The consumption log is append-only: records go in once and are never
/// rewritten. Totals live on the agent and only move through the atomic
/// `add_consumption_totals` operation.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn insert(&self, agent: Agent) -> Result<(), AgentRepositoryError>;

    async fn get(&self, agent_id: Uuid) -> Result<Option<Agent>, AgentRepositoryError>;

    /// Every content id referenced by the agent's consumption records.
    /// Unknown agents have consumed nothing: the set is empty.
    async fn consumed_content_ids(
        &self,
        agent_id: Uuid,
    ) -> Result<HashSet<Uuid>, AgentRepositoryError>;

    async fn append_consumption(
        &self,
        record: ConsumptionRecord,
    ) -> Result<(), AgentRepositoryError>;

    /// Atomically bumps the agent's consumption count by one and its watch
    /// time by `watch_seconds`, and refreshes `last_active_at`.
    async fn add_consumption_totals(
        &self,
        agent_id: Uuid,
        watch_seconds: f64,
    ) -> Result<(), AgentRepositoryError>;

    /// Most recent records first.
    async fn consumption_history(
        &self,
        agent_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConsumptionRecord>, AgentRepositoryError>;
}

#[derive(thiserror::Error)]
pub enum AgentRepositoryError {
    #[error("Agent {0} does not exist")]
    UnknownAgent(Uuid),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl std::fmt::Debug for AgentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
