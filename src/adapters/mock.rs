//! Mock collaborators for testing.
//!
//! Each mock returns a canned value or a canned failure and counts how many
//! times it was called, so tests can assert which stages of the pipeline ran.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::errors::{DomainResult, UpstreamError};
use crate::domain::models::{
    sort_by_score_desc, EmbeddingVector, InferenceResult, ModelSelector, Prompt, Question,
    RetrievedPassage,
};
use crate::domain::ports::{EmbeddingProvider, InferenceBackend, PassageStore};

/// Mock embedding provider.
pub struct MockEmbeddingProvider {
    vector: EmbeddingVector,
    failure: Option<UpstreamError>,
    calls: AtomicUsize,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::with_vector(vec![0.1, 0.2, 0.3, 0.4])
    }
}

impl MockEmbeddingProvider {
    pub fn with_vector(vector: EmbeddingVector) -> Self {
        Self {
            vector,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            vector: Vec::new(),
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn dimension(&self) -> usize {
        self.vector.len()
    }

    async fn embed(&self, _question: &Question) -> DomainResult<EmbeddingVector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone().into()),
            None => Ok(self.vector.clone()),
        }
    }
}

/// Mock vector store.
#[derive(Default)]
pub struct MockPassageStore {
    passages: Vec<RetrievedPassage>,
    failure: Option<UpstreamError>,
    calls: AtomicUsize,
}

impl MockPassageStore {
    /// Store holding these passages. Searches return the `top_k` highest
    /// scoring ones, most similar first; equal scores keep insertion order.
    pub fn with_passages(passages: Vec<RetrievedPassage>) -> Self {
        Self {
            passages,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            passages: Vec::new(),
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PassageStore for MockPassageStore {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, _vector: &[f32], top_k: usize) -> DomainResult<Vec<RetrievedPassage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone().into()),
            None => {
                let mut passages = self.passages.clone();
                sort_by_score_desc(&mut passages);
                passages.truncate(top_k);
                Ok(passages)
            }
        }
    }
}

/// Mock inference backend.
pub struct MockInferenceBackend {
    selector: ModelSelector,
    result: InferenceResult,
    failure: Option<UpstreamError>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<Prompt>>,
}

impl MockInferenceBackend {
    pub fn answering(selector: ModelSelector, answer: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            selector,
            result: InferenceResult::new(answer, latency_ms),
            failure: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(selector: ModelSelector, error: UpstreamError) -> Self {
        Self {
            selector,
            result: InferenceResult::new("", 0),
            failure: Some(error),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The prompt most recently passed to `generate`.
    pub fn last_prompt(&self) -> Option<Prompt> {
        self.last_prompt
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceBackend for MockInferenceBackend {
    fn selector(&self) -> ModelSelector {
        self.selector
    }

    async fn generate(&self, prompt: &Prompt) -> DomainResult<InferenceResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.clone());
        }
        match &self.failure {
            Some(err) => Err(err.clone().into()),
            None => Ok(self.result.clone()),
        }
    }
}
