//! Orchestrator output.

use serde::{Deserialize, Serialize};

use super::passage::RetrievedPassage;
use super::question::ModelSelector;

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,

    /// Passages the answer was grounded on, most relevant first.
    pub sources: Vec<RetrievedPassage>,

    /// Wall-clock time from embedding start to generation end.
    pub response_time_ms: u64,

    pub model_used: ModelSelector,

    /// A related stored question the caller may want to ask next.
    #[serde(default)]
    pub suggested_question: Option<String>,
}

/// Liveness probe payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
