//! Query orchestration
//!
//! Runs one question through embed, retrieve, assemble and generate, in that
//! order, and folds the results into a [`QueryResponse`]. Any stage failing
//! aborts the request.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    HealthStatus, ModelSelector, Question, QueryResponse, RetrievalConfig, RetrievedPassage,
    META_QUESTION,
};
use crate::domain::ports::EmbeddingProvider;
use crate::services::follow_up::suggest_follow_up;
use crate::services::inference_dispatcher::InferenceDispatcher;
use crate::services::prompt_builder::{truncate_chars, PromptBuilder};
use crate::services::retriever::PassageRetriever;

/// Answers questions end to end.
///
/// Holds no per-request state; one instance is shared by every request.
pub struct QueryService {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: PassageRetriever,
    builder: PromptBuilder,
    dispatcher: InferenceDispatcher,
    retrieval: RetrievalConfig,
}

impl QueryService {
    /// Create the orchestrator
    ///
    /// # Arguments
    /// * `embedder` - Turns the question into a query vector
    /// * `retriever` - Finds passages for the vector
    /// * `builder` - Folds passages and question into a prompt
    /// * `dispatcher` - Sends the prompt to the selected backend
    /// * `retrieval` - Top-K and source projection limits
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: PassageRetriever,
        builder: PromptBuilder,
        dispatcher: InferenceDispatcher,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            retriever,
            builder,
            dispatcher,
            retrieval,
        }
    }

    /// Liveness probe. Touches no collaborator.
    pub fn health_check(&self) -> HealthStatus {
        HealthStatus::ok()
    }

    /// Answer a question with a model named by its wire string.
    pub async fn answer_question_by_name(&self, question: &str, model: &str) -> DomainResult<QueryResponse> {
        let model: ModelSelector = model.parse()?;
        self.answer_question(question, model).await
    }

    /// Answer a question.
    ///
    /// Input is validated before any outbound call: a blank question or an
    /// unconfigured backend fails with a validation error and nothing is
    /// embedded.
    ///
    /// # Returns
    /// * `Ok(QueryResponse)` - Answer, sources and timing
    /// * `Err(DomainError::Validation)` - Blank question or unavailable model
    /// * `Err(DomainError::Upstream)` - A collaborator failed or timed out
    #[instrument(skip(self, question), fields(model = %model))]
    pub async fn answer_question(&self, question: &str, model: ModelSelector) -> DomainResult<QueryResponse> {
        let question = Question::new(question)?;
        if !self.dispatcher.is_available(model) {
            return Err(DomainError::validation("Custom model not configured"));
        }

        let started = Instant::now();

        let vector = self.embedder.embed(&question).await?;
        debug!(provider = self.embedder.name(), dimension = vector.len(), "embedded question");

        let passages = self.retriever.retrieve(&vector, self.retrieval.top_k).await?;
        let prompt = self.builder.assemble(&question, &passages);
        let result = self.dispatcher.generate(&prompt, model).await?;

        let response_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let suggested_question = suggest_follow_up(question.as_str(), &result.answer, &passages);
        let sources = self.project_sources(&passages);

        info!(
            passages = passages.len(),
            grounded = prompt.is_grounded(),
            response_time_ms,
            "answered question"
        );

        Ok(QueryResponse {
            answer: result.answer,
            sources,
            response_time_ms,
            model_used: model,
            suggested_question,
        })
    }

    /// Caller-facing view of the top passages: rounded scores and a
    /// shortened stored question.
    fn project_sources(&self, passages: &[RetrievedPassage]) -> Vec<RetrievedPassage> {
        passages
            .iter()
            .take(self.retrieval.max_sources)
            .map(|passage| {
                let mut source = passage.clone();
                source.score = round_score(passage.score);
                if let Some(question) = passage.question() {
                    let short = truncate_chars(question, self.retrieval.source_question_chars).to_string();
                    source.metadata.insert(META_QUESTION.to_string(), short.into());
                }
                source
            })
            .collect()
    }
}

/// Round to four decimal places.
fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
