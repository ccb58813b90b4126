use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::configuration::EmbeddingSettings;
use crate::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

/// Rough input cap, staying under the provider's token limit
const MAX_INPUT_CHARS: usize = 30_000;

/// Embedding provider backed by an OpenAI-compatible embeddings endpoint.
///
/// Without an API key the provider is permanently unavailable: every call
/// reports `Ok(None)` and the rest of the service degrades to embedding-less
/// behavior (absent vectors, default ranking).
pub struct OpenAiEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<Secret<String>>,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbeddingProvider {
    pub fn new(settings: &EmbeddingSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            // The builder only fails on TLS backend or resolver misconfiguration
            .expect("Failed to build the embedding HTTP client");

        Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            dimensions: settings.dimensions,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequestBody<'a> {
    model: &'a str,
    input: &'a str,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponseBody {
    data: Vec<EmbeddingResponseItem>,
}

#[derive(Deserialize)]
struct EmbeddingResponseItem {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    #[tracing::instrument(name = "Requesting embedding from provider", skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Option<Vec<f32>>, EmbeddingProviderError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Ok(None);
        };

        if text.is_empty() {
            return Ok(None);
        }

        let input: String = text.chars().take(MAX_INPUT_CHARS).collect();

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(&EmbeddingRequestBody {
                model: &self.model,
                input: &input,
                dimensions: self.dimensions,
            })
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| EmbeddingProviderError::RequestFailed(error.to_string()))?;

        let body: EmbeddingResponseBody = response
            .json()
            .await
            .map_err(|error| EmbeddingProviderError::UnexpectedResponse(error.to_string()))?;

        let vector = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| {
                EmbeddingProviderError::UnexpectedResponse("empty data array".to_string())
            })?
            .embedding;

        if vector.len() != self.dimensions {
            return Err(EmbeddingProviderError::UnexpectedResponse(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                vector.len()
            )));
        }

        Ok(Some(vector))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
