//! Generation prompts and normalized backend results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A fully assembled generation prompt.
///
/// The backends disagree on wire shape (chat messages versus a
/// context/question pair), so the prompt keeps its parts alongside the
/// rendered user message. Two prompts built from the same inputs are equal
/// byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    system: String,
    context: String,
    question: String,
    user: String,
}

impl Prompt {
    pub fn new(
        system: impl Into<String>,
        context: impl Into<String>,
        question: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            system: system.into(),
            context: context.into(),
            question: question.into(),
            user: user.into(),
        }
    }

    /// Instruction given to the model as the system role.
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Retrieved context, empty when nothing was retrieved.
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Rendered user message (context plus question).
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Whether the prompt carries retrieved context.
    pub fn is_grounded(&self) -> bool {
        !self.context.is_empty()
    }

    /// The complete prompt as one string.
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{}", self.system, self.user)
    }
}

/// Backend output normalized to one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Generated answer, trimmed.
    pub answer: String,

    /// Time spent waiting on the backend.
    pub latency_ms: u64,

    /// Backend-specific extras (token usage, finish reason, ...).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub diagnostics: serde_json::Map<String, serde_json::Value>,
}

impl InferenceResult {
    pub fn new(answer: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            answer: answer.into(),
            latency_ms,
            diagnostics: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_diagnostic(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.diagnostics.insert(key.into(), value.into());
        self
    }
}
