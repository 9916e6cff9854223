//! Groq inference backend.
//!
//! Talks to Groq's OpenAI-compatible `/chat/completions` endpoint. The
//! prompt is sent as a system message plus one user message.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{Collaborator, DomainResult, UpstreamError};
use crate::domain::models::{GroqConfig, InferenceResult, ModelSelector, Prompt};
use crate::domain::ports::InferenceBackend;

const MAX_ERROR_BODY: usize = 512;

/// Groq chat-completions client.
pub struct GroqBackend {
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl GroqBackend {
    pub fn new(config: &GroqConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("GROQ_API_KEY is not set"))?;
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout,
            client,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl InferenceBackend for GroqBackend {
    fn selector(&self) -> ModelSelector {
        ModelSelector::Groq
    }

    async fn generate(&self, prompt: &Prompt) -> DomainResult<InferenceResult> {
        let url = format!("{}/chat/completions", self.base_url);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(Collaborator::Groq, &e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(UpstreamError::status(Collaborator::Groq, status.as_u16(), body).into());
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::malformed(Collaborator::Groq, e.to_string()))?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::malformed(Collaborator::Groq, "response carried no choices"))?;
        let answer = choice.message.content.unwrap_or_default();

        let mut result = InferenceResult::new(answer.trim(), latency_ms);
        if let Some(model) = completion.model {
            result = result.with_diagnostic("model", model);
        }
        if let Some(reason) = choice.finish_reason {
            result = result.with_diagnostic("finish_reason", reason);
        }
        if let Some(usage) = completion.usage {
            result = result
                .with_diagnostic("prompt_tokens", usage.prompt_tokens)
                .with_diagnostic("completion_tokens", usage.completion_tokens);
        }
        Ok(result)
    }
}

// -- OpenAI-compatible request/response types --

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}
