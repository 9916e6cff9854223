//! Vector store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::RetrievedPassage;

/// Similarity search over stored passages.
///
/// Implementations query the store on every call; nothing is cached between
/// requests.
#[async_trait]
pub trait PassageStore: Send + Sync {
    /// Store name for logging.
    fn name(&self) -> &'static str;

    /// Return at most `top_k` passages most similar to `vector`.
    ///
    /// Results may come back in any order and may be fewer than `top_k`;
    /// callers sort them.
    async fn search(&self, vector: &[f32], top_k: usize) -> DomainResult<Vec<RetrievedPassage>>;
}
