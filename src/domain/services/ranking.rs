//! Selection of the ordering applied to a feed's candidate pool.

use rand::Rng;
use serde::Serialize;

use crate::domain::entities::agent::Agent;

/// Probability that an agent without a preference vector gets the popularity
/// ordering rather than the recency one. One draw per request, not per item.
pub const TRENDING_BIAS: f64 = 0.7;

/// One of the four mutually exclusive orderings of a candidate pool.
///
/// The semantic variant owns the preference vector it ranks against, so a
/// strategy can only be executed with the data its ordering needs: there is
/// no "semantic but no vector" state to check for downstream.
#[derive(Debug, Clone)]
pub enum RankingStrategy {
    /// Ascending cosine distance to the agent's preference vector
    Semantic { preference_vector: Vec<f32> },
    /// Descending popularity counter
    Trending,
    /// Descending creation timestamp
    Recency,
    /// Uniform shuffle of the pool
    Discovery,
}

impl RankingStrategy {
    /// Strategy for a personalized feed request.
    ///
    /// An agent with a preference vector always gets the semantic ordering.
    /// Anyone else (anonymous, unknown id, vector-less agent) gets a
    /// per-request coin flip between popularity and recency, drawn from the
    /// caller's injected randomness source.
    pub fn for_personalized_feed<R: Rng + ?Sized>(agent: Option<&Agent>, rng: &mut R) -> Self {
        match agent.and_then(|agent| agent.preference_embedding.as_ref()) {
            Some(vector) => Self::Semantic {
                preference_vector: vector.clone(),
            },
            None => {
                if rng.gen_bool(TRENDING_BIAS) {
                    Self::Trending
                } else {
                    Self::Recency
                }
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Semantic { .. } => StrategyKind::Semantic,
            Self::Trending => StrategyKind::Trending,
            Self::Recency => StrategyKind::Recency,
            Self::Discovery => StrategyKind::Discovery,
        }
    }
}

/// Serializable name of the strategy that produced a feed item, surfaced in
/// each item's rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Semantic,
    Trending,
    Recency,
    Discovery,
}
