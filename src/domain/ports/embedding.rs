//! Embedding provider port.
//!
//! Converts a question into the dense vector used for similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingVector, Question};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "voyage", "mock").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Embed a single question with one outbound call.
    ///
    /// Fails with an upstream error when the provider is unreachable,
    /// answers with a non-success status, or returns no vector.
    async fn embed(&self, question: &Question) -> DomainResult<EmbeddingVector>;
}
