//! Common test utilities for integration tests
//!
//! Builds a [`QueryService`] over mock collaborators and keeps handles to
//! the mocks so tests can assert which stages ran.

#![allow(dead_code)]

use std::sync::Arc;

use quantum_rag::adapters::mock::{MockEmbeddingProvider, MockInferenceBackend, MockPassageStore};
use quantum_rag::domain::models::{
    ModelSelector, RetrievalConfig, RetrievedPassage, META_QUESTION, META_SOURCE,
};
use quantum_rag::domain::ports::InferenceBackend;
use quantum_rag::services::{InferenceDispatcher, PassageRetriever, PromptBuilder, QueryService};

pub const GROQ_ANSWER: &str = "A qubit is a two-level quantum system.";
pub const CUSTOM_ANSWER: &str = "A qubit is the basic unit of quantum information.";

/// Setup test logging
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("quantum_rag=debug")
        .with_test_writer()
        .try_init();
}

pub struct Pipeline {
    pub service: Arc<QueryService>,
    pub embedder: Arc<MockEmbeddingProvider>,
    pub store: Arc<MockPassageStore>,
    pub groq: Arc<MockInferenceBackend>,
    pub custom: Arc<MockInferenceBackend>,
}

impl Pipeline {
    pub fn outbound_calls(&self) -> usize {
        self.embedder.call_count()
            + self.store.call_count()
            + self.groq.call_count()
            + self.custom.call_count()
    }
}

pub fn passage(source: &str, question: &str, answer: &str, score: f64) -> RetrievedPassage {
    RetrievedPassage::new(answer, score)
        .with_metadata(META_SOURCE, source)
        .with_metadata(META_QUESTION, question)
}

pub fn qubit_passages() -> Vec<RetrievedPassage> {
    vec![
        passage(
            "stackexchange",
            "What is a qubit?",
            "A qubit is a quantum bit that can be in a superposition of 0 and 1.",
            0.93,
        ),
        passage(
            "textbook",
            "How does measurement affect a superposition?",
            "Measuring a superposition collapses it to a single basis state.",
            0.81,
        ),
    ]
}

/// A pipeline over the given collaborators. `custom: None` leaves the
/// custom backend unconfigured.
pub fn pipeline_with(
    embedder: MockEmbeddingProvider,
    store: MockPassageStore,
    groq: MockInferenceBackend,
    custom: Option<MockInferenceBackend>,
) -> Pipeline {
    let embedder = Arc::new(embedder);
    let store = Arc::new(store);
    let groq = Arc::new(groq);
    let custom_configured = custom.is_some();
    let custom = Arc::new(custom.unwrap_or_else(|| {
        MockInferenceBackend::answering(ModelSelector::Custom, CUSTOM_ANSWER, 0)
    }));

    let dispatcher = InferenceDispatcher::new(
        groq.clone(),
        custom_configured.then(|| custom.clone() as Arc<dyn InferenceBackend>),
    )
    .unwrap();
    let service = QueryService::new(
        embedder.clone(),
        PassageRetriever::new(store.clone(), None),
        PromptBuilder::default(),
        dispatcher,
        RetrievalConfig::default(),
    );

    Pipeline {
        service: Arc::new(service),
        embedder,
        store,
        groq,
        custom,
    }
}

/// Both backends configured and answering, two passages in the store.
pub fn pipeline() -> Pipeline {
    pipeline_with(
        MockEmbeddingProvider::default(),
        MockPassageStore::with_passages(qubit_passages()),
        MockInferenceBackend::answering(ModelSelector::Groq, GROQ_ANSWER, 1200),
        Some(MockInferenceBackend::answering(
            ModelSelector::Custom,
            CUSTOM_ANSWER,
            24_000,
        )),
    )
}
