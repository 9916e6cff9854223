//! Voyage AI embedding provider adapter.
//!
//! Calls the `/embeddings` endpoint with `input_type = "query"` so the
//! vector lands in the same space as the stored document embeddings.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{Collaborator, DomainResult, UpstreamError};
use crate::domain::models::{EmbeddingConfig, EmbeddingVector, Question};
use crate::domain::ports::EmbeddingProvider;

/// Longest upstream error body kept in an error.
const MAX_ERROR_BODY: usize = 512;

/// Voyage AI embedding provider.
pub struct VoyageEmbeddingProvider {
    api_key: String,
    base_url: String,
    model: String,
    input_type: String,
    dimension: usize,
    timeout: Duration,
    client: reqwest::Client,
}

impl VoyageEmbeddingProvider {
    /// Build the provider from configuration.
    ///
    /// Fails when no API key is configured or the HTTP client cannot be built.
    pub fn new(config: &EmbeddingConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("VOYAGE_API_KEY is not set"))?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            input_type: config.input_type.clone(),
            dimension: config.dimension,
            timeout,
            client,
        })
    }

    async fn call_embeddings_api(&self, text: &str) -> Result<EmbeddingsResponse, UpstreamError> {
        let url = format!("{}/embeddings", self.base_url);
        let request_body = EmbeddingsRequest {
            input: vec![text],
            model: &self.model,
            input_type: &self.input_type,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(Collaborator::Embedding, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(UpstreamError::status(
                Collaborator::Embedding,
                status.as_u16(),
                truncate_body(&body),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(Collaborator::Embedding, e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for VoyageEmbeddingProvider {
    fn name(&self) -> &'static str {
        "voyage"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, question: &Question) -> DomainResult<EmbeddingVector> {
        let response = self.call_embeddings_api(question.as_str()).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(model = %self.model, total_tokens = usage.total_tokens, "embedding usage");
        }

        let vector = response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| UpstreamError::malformed(Collaborator::Embedding, "response carried no embedding"))?;

        Ok(vector)
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY).collect()
}

// -- Voyage API request/response types --

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: Vec<&'a str>,
    model: &'a str,
    input_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}
