//! Passage retrieval
//!
//! Wraps a [`PassageStore`] with the ordering and size guarantees the rest
//! of the pipeline relies on.

use std::sync::Arc;

use crate::domain::errors::{Collaborator, DomainError, DomainResult, UpstreamError};
use crate::domain::models::{sort_by_score_desc, RetrievedPassage};
use crate::domain::ports::PassageStore;

/// Retrieves the top-K passages for a query vector.
pub struct PassageRetriever {
    store: Arc<dyn PassageStore>,
    dimension: Option<usize>,
}

impl PassageRetriever {
    /// Create a retriever.
    ///
    /// # Arguments
    /// * `store` - Vector store implementation
    /// * `dimension` - Expected vector dimension; `None` leaves the check to the store
    pub fn new(store: Arc<dyn PassageStore>, dimension: Option<usize>) -> Self {
        Self { store, dimension }
    }

    /// Fetch passages ordered by descending score, at most `top_k` of them.
    ///
    /// # Returns
    /// * `Ok(Vec<RetrievedPassage>)` - Most relevant first; ties keep store order
    /// * `Err(DomainError::Validation)` - `top_k` is zero
    /// * `Err(DomainError::Upstream)` - Dimension mismatch or store failure
    pub async fn retrieve(&self, vector: &[f32], top_k: usize) -> DomainResult<Vec<RetrievedPassage>> {
        if top_k == 0 {
            return Err(DomainError::validation("top_k must be a positive integer"));
        }

        if let Some(expected) = self.dimension {
            if vector.len() != expected {
                return Err(UpstreamError::malformed(
                    Collaborator::VectorStore,
                    format!(
                        "query vector has {} dimensions, store expects {}",
                        vector.len(),
                        expected
                    ),
                )
                .into());
            }
        }

        let mut passages = self.store.search(vector, top_k).await?;
        sort_by_score_desc(&mut passages);
        passages.truncate(top_k);

        tracing::debug!(
            store = self.store.name(),
            requested = top_k,
            returned = passages.len(),
            "retrieved passages"
        );

        Ok(passages)
    }
}
