//! End-to-end pipeline tests over mock collaborators.

mod common;

use std::time::Duration;

use quantum_rag::adapters::mock::{MockEmbeddingProvider, MockInferenceBackend, MockPassageStore};
use quantum_rag::domain::errors::{Collaborator, DomainError, UpstreamError};
use quantum_rag::domain::models::ModelSelector;

use common::{pipeline, pipeline_with, qubit_passages, setup_test_logging, GROQ_ANSWER};

#[tokio::test]
async fn test_what_is_a_qubit_with_groq() {
    setup_test_logging();
    let p = pipeline();

    let response = p
        .service
        .answer_question("What is a qubit?", ModelSelector::Groq)
        .await
        .unwrap();

    assert_eq!(response.answer, GROQ_ANSWER);
    assert_eq!(response.model_used, ModelSelector::Groq);
    assert_eq!(response.sources.len(), 2);
    assert!(response.sources[0].score >= response.sources[1].score);
    assert_eq!(
        response.suggested_question.as_deref(),
        Some("How does measurement affect a superposition?")
    );
    assert_eq!(p.custom.call_count(), 0);

    let prompt = p.groq.last_prompt().unwrap();
    assert!(prompt.is_grounded());
    assert!(prompt.text().contains("What is a qubit?"));
}

#[tokio::test]
async fn test_each_model_is_reported_back() {
    let p = pipeline();

    for name in ["groq", "custom"] {
        let response = p
            .service
            .answer_question_by_name("Explain entanglement", name)
            .await
            .unwrap();
        assert_eq!(response.model_used.as_str(), name);
    }
    assert_eq!(p.embedder.call_count(), 2);
    assert_eq!((p.groq.call_count(), p.custom.call_count()), (1, 1));
}

#[tokio::test]
async fn test_validation_happens_before_any_outbound_call() {
    let p = pipeline();

    let blank = p.service.answer_question_by_name("  \t ", "groq").await.unwrap_err();
    let unknown = p
        .service
        .answer_question_by_name("What is a qubit?", "llama")
        .await
        .unwrap_err();

    assert!(blank.is_validation());
    assert!(unknown.is_validation());
    assert_eq!(p.outbound_calls(), 0);
}

#[tokio::test]
async fn test_custom_timeout_is_not_retried_on_groq() {
    let p = pipeline_with(
        MockEmbeddingProvider::default(),
        MockPassageStore::with_passages(qubit_passages()),
        MockInferenceBackend::answering(ModelSelector::Groq, GROQ_ANSWER, 900),
        Some(MockInferenceBackend::failing(
            ModelSelector::Custom,
            UpstreamError::timeout(Collaborator::Custom, Duration::from_secs(300)),
        )),
    );

    let err = p
        .service
        .answer_question("What is a qubit?", ModelSelector::Custom)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Upstream(ref e) if e.is_timeout()));
    assert_eq!(p.custom.call_count(), 1);
    assert_eq!(p.groq.call_count(), 0);
}

#[tokio::test]
async fn test_embedder_failure_skips_later_stages() {
    let p = pipeline_with(
        MockEmbeddingProvider::failing(UpstreamError::unreachable(
            Collaborator::Embedding,
            "dns failure",
        )),
        MockPassageStore::with_passages(qubit_passages()),
        MockInferenceBackend::answering(ModelSelector::Groq, GROQ_ANSWER, 900),
        None,
    );

    let err = p
        .service
        .answer_question("What is a qubit?", ModelSelector::Groq)
        .await
        .unwrap_err();

    assert_eq!(err.collaborator(), Some(Collaborator::Embedding));
    assert_eq!(p.store.call_count(), 0);
    assert_eq!(p.groq.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_questions_share_one_service() {
    let p = pipeline();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = p.service.clone();
            tokio::spawn(async move {
                service
                    .answer_question(&format!("Question number {i}?"), ModelSelector::Groq)
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.answer, GROQ_ANSWER);
    }
    assert_eq!(p.groq.call_count(), 8);
    assert_eq!(p.store.call_count(), 8);
}
