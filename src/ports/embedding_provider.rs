use async_trait::async_trait;

use crate::helper::error_chain_fmt;

/// Black-box text-to-vector port.
///
/// `Ok(None)` means the provider is not available (not configured, or it
/// declined the input); callers degrade to embedding-less behavior and must
/// never fail a request over it. `Err` carries a provider fault worth
/// logging, with the same degraded outcome.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingProviderError>;

    /// Fixed dimensionality of every vector this provider produces.
    fn dimensions(&self) -> usize;
}

#[derive(thiserror::Error)]
pub enum EmbeddingProviderError {
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),
    #[error("Unexpected embedding provider response: {0}")]
    UnexpectedResponse(String),
}

impl std::fmt::Debug for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
