//! Custom-model backend served from a Modal web endpoint.
//!
//! The endpoint takes the retrieved context and the question separately and
//! answers with `{"answer": ...}`. The first request after the container
//! idles pays a GPU cold start, hence the long default timeout.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{Collaborator, DomainResult, UpstreamError};
use crate::domain::models::{CustomModelConfig, InferenceResult, ModelSelector, Prompt};
use crate::domain::ports::InferenceBackend;

/// Modal endpoint client.
pub struct ModalBackend {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ModalBackend {
    /// Build the client, or `Ok(None)` when no endpoint is configured.
    pub fn from_config(config: &CustomModelConfig) -> anyhow::Result<Option<Self>> {
        config
            .endpoint()
            .map(|url| Self::new(url, Duration::from_secs(config.timeout_secs)))
            .transpose()
    }

    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            timeout,
            client,
        })
    }
}

#[async_trait]
impl InferenceBackend for ModalBackend {
    fn selector(&self) -> ModelSelector {
        ModelSelector::Custom
    }

    async fn generate(&self, prompt: &Prompt) -> DomainResult<InferenceResult> {
        let started = Instant::now();
        let body = GenerateRequest {
            context: prompt.context(),
            question: prompt.question(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(Collaborator::Custom, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text: String = text.chars().take(512).collect();
            return Err(UpstreamError::status(Collaborator::Custom, status.as_u16(), text).into());
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::from_reqwest(Collaborator::Custom, &e, self.timeout))?;
        let answer = payload
            .answer
            .ok_or_else(|| UpstreamError::malformed(Collaborator::Custom, "response carried no answer"))?;

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(latency_ms, "custom model answered");
        Ok(InferenceResult::new(answer.trim(), latency_ms))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    context: &'a str,
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    answer: Option<String>,
}
