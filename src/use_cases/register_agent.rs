use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::agent::Agent;
use crate::helper::error_chain_fmt;
use crate::ports::agent_repository::{AgentRepository, AgentRepositoryError};
use crate::ports::embedding_provider::EmbeddingProvider;

#[derive(Debug, Clone)]
pub struct RegisterAgentRequest {
    pub name: String,
    pub description: Option<String>,
    pub agent_type: Option<String>,
    pub interests: Vec<String>,
    pub metadata: JsonValue,
}

/// Creates an agent and bootstraps its preference vector from the declared
/// interests.
pub struct RegisterAgentUseCase {
    agent_repository: Arc<dyn AgentRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl RegisterAgentUseCase {
    pub fn new(
        agent_repository: Arc<dyn AgentRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            agent_repository,
            embedding_provider,
        }
    }

    #[tracing::instrument(name = "Registering agent", skip(self, request), fields(agent_name = %request.name))]
    pub async fn execute(
        &self,
        request: RegisterAgentRequest,
    ) -> Result<Agent, RegisterAgentError> {
        if request.name.trim().is_empty() {
            return Err(RegisterAgentError::InvalidName);
        }

        let preference_embedding = self.bootstrap_preference_vector(&request.interests).await;

        let now = Utc::now();
        let agent = Agent {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            agent_type: request.agent_type,
            interests: request.interests,
            preference_embedding,
            total_content_consumed: 0,
            total_watch_time_seconds: 0.0,
            metadata: request.metadata,
            created_at: now,
            last_active_at: now,
        };

        self.agent_repository.insert(agent.clone()).await?;

        info!(
            agent_id = %agent.id,
            personalized = agent.has_preference_vector(),
            "Registered agent"
        );

        Ok(agent)
    }

    /// Embeds the space-joined interests, once, at registration time.
    ///
    /// A provider failure degrades to an absent vector: registration never
    /// fails because embeddings are down.
    async fn bootstrap_preference_vector(&self, interests: &[String]) -> Option<Vec<f32>> {
        if interests.is_empty() {
            return None;
        }

        let interests_text = interests.join(" ");

        match self.embedding_provider.embed(&interests_text).await {
            Ok(vector) => vector,
            Err(error) => {
                warn!(
                    ?error,
                    "Embedding provider failed, registering agent without a preference vector"
                );
                None
            }
        }
    }
}

#[derive(thiserror::Error)]
pub enum RegisterAgentError {
    #[error("Agent name must not be empty")]
    InvalidName,
    #[error(transparent)]
    AgentRepositoryError(#[from] AgentRepositoryError),
}

impl std::fmt::Debug for RegisterAgentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
