//! Retrieved passages and the vectors used to find them.

use serde::{Deserialize, Serialize};

/// Dense embedding of a question. Dimensionality is fixed by the provider.
pub type EmbeddingVector = Vec<f32>;

/// Metadata key holding the originating document identifier.
pub const META_SOURCE: &str = "source";

/// Metadata key holding the stored question paired with the passage.
pub const META_QUESTION: &str = "question";

/// A passage returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Passage body.
    pub text: String,

    /// Similarity to the query (higher is more relevant).
    pub score: f64,

    /// Scalar metadata (source identifier, stored question, ...).
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl RetrievedPassage {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
            metadata: serde_json::Map::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn source(&self) -> Option<&str> {
        self.metadata_str(META_SOURCE)
    }

    /// The question this passage answers, when the store keeps Q&A pairs.
    pub fn question(&self) -> Option<&str> {
        self.metadata_str(META_QUESTION)
    }
}

/// Sort passages by descending score. Stable, so equal scores keep store order.
pub fn sort_by_score_desc(passages: &mut [RetrievedPassage]) {
    passages.sort_by(|a, b| b.score.total_cmp(&a.score));
}
