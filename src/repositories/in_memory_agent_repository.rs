use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::agent::Agent;
use crate::domain::entities::consumption::ConsumptionRecord;
use crate::ports::agent_repository::{AgentRepository, AgentRepositoryError};

/// Agent repository held in process memory.
///
/// The consumption totals are atomics so that `add_consumption_totals` is a
/// set of `fetch_add`/`store` operations: no read-then-write, whatever the
/// number of concurrent callers. Watch time is accumulated in milliseconds
/// to stay in integer (atomic) arithmetic.
struct AgentRow {
    agent: Agent,
    total_consumed: AtomicU64,
    watch_time_ms: AtomicU64,
    last_active_at_ms: AtomicI64,
}

impl AgentRow {
    fn snapshot(&self) -> Agent {
        let mut agent = self.agent.clone();
        agent.total_content_consumed = self.total_consumed.load(Ordering::Relaxed);
        agent.total_watch_time_seconds = self.watch_time_ms.load(Ordering::Relaxed) as f64 / 1000.0;

        let last_active_ms = self.last_active_at_ms.load(Ordering::Relaxed);
        if let Some(last_active_at) = Utc.timestamp_millis_opt(last_active_ms).single() {
            agent.last_active_at = last_active_at;
        }

        agent
    }
}

pub struct InMemoryAgentRepository {
    agents: RwLock<HashMap<Uuid, Arc<AgentRow>>>,
    /// Append-only consumption log, in arrival order
    consumptions: RwLock<Vec<ConsumptionRecord>>,
}

impl Default for InMemoryAgentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            consumptions: RwLock::new(Vec::new()),
        }
    }

    fn row(&self, agent_id: Uuid) -> Result<Arc<AgentRow>, AgentRepositoryError> {
        let agents = self.agents.read().expect("agent repository lock poisoned");

        agents
            .get(&agent_id)
            .cloned()
            .ok_or(AgentRepositoryError::UnknownAgent(agent_id))
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    #[tracing::instrument(name = "Saving agent in memory", skip(self, agent), fields(agent_id = %agent.id))]
    async fn insert(&self, agent: Agent) -> Result<(), AgentRepositoryError> {
        let mut agents = self.agents.write().expect("agent repository lock poisoned");

        let row = AgentRow {
            total_consumed: AtomicU64::new(agent.total_content_consumed),
            watch_time_ms: AtomicU64::new((agent.total_watch_time_seconds * 1000.0) as u64),
            last_active_at_ms: AtomicI64::new(agent.last_active_at.timestamp_millis()),
            agent,
        };
        agents.insert(row.agent.id, Arc::new(row));

        Ok(())
    }

    async fn get(&self, agent_id: Uuid) -> Result<Option<Agent>, AgentRepositoryError> {
        let agents = self.agents.read().expect("agent repository lock poisoned");

        Ok(agents.get(&agent_id).map(|row| row.snapshot()))
    }

    async fn consumed_content_ids(
        &self,
        agent_id: Uuid,
    ) -> Result<HashSet<Uuid>, AgentRepositoryError> {
        let consumptions = self
            .consumptions
            .read()
            .expect("agent repository lock poisoned");

        Ok(consumptions
            .iter()
            .filter(|record| record.agent_id == agent_id)
            .map(|record| record.content_id)
            .collect())
    }

    #[tracing::instrument(name = "Appending consumption record in memory", skip(self, record), fields(record_id = %record.id))]
    async fn append_consumption(
        &self,
        record: ConsumptionRecord,
    ) -> Result<(), AgentRepositoryError> {
        let mut consumptions = self
            .consumptions
            .write()
            .expect("agent repository lock poisoned");

        consumptions.push(record);

        Ok(())
    }

    async fn add_consumption_totals(
        &self,
        agent_id: Uuid,
        watch_seconds: f64,
    ) -> Result<(), AgentRepositoryError> {
        let row = self.row(agent_id)?;

        row.total_consumed.fetch_add(1, Ordering::Relaxed);
        row.watch_time_ms
            .fetch_add((watch_seconds * 1000.0).round() as u64, Ordering::Relaxed);
        row.last_active_at_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);

        Ok(())
    }

    async fn consumption_history(
        &self,
        agent_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConsumptionRecord>, AgentRepositoryError> {
        let consumptions = self
            .consumptions
            .read()
            .expect("agent repository lock poisoned");

        // Walked in reverse so that records sharing a timestamp keep the
        // newest-appended-first order through the stable sort
        let mut history: Vec<ConsumptionRecord> = consumptions
            .iter()
            .rev()
            .filter(|record| record.agent_id == agent_id)
            .cloned()
            .collect();

        history.sort_by(|a, b| b.consumed_at.cmp(&a.consumed_at));
        history.truncate(limit);

        Ok(history)
    }
}
