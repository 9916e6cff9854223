//! Prompt assembly.
//!
//! Folds retrieved passages and the question into a fixed template. The
//! builder is pure: identical inputs always give byte-identical prompts.

use crate::domain::models::{Prompt, Question, RetrievalConfig, RetrievedPassage};

/// System instruction used when context was retrieved.
pub const SYSTEM_PROMPT: &str = "You are a quantum computing assistant for beginners. \
Answer using the provided context. Keep explanations simple and accessible. \
Do not use complex math or equations. Be concise but thorough.";

/// System instruction used when retrieval came back empty.
pub const GENERAL_KNOWLEDGE_SYSTEM_PROMPT: &str = "You are a quantum computing assistant for beginners. \
No reference material matched this question, so answer from general knowledge \
and say briefly that no supporting context was found. Keep explanations simple \
and accessible. Do not use complex math or equations. Be concise but thorough.";

/// Builds generation prompts from a question and its passages.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    context_passages: usize,
    snippet_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&RetrievalConfig::default())
    }
}

impl PromptBuilder {
    /// # Arguments
    /// * `context_passages` - How many of the top passages enter the context
    /// * `snippet_chars` - Characters kept from each passage body
    pub fn new(context_passages: usize, snippet_chars: usize) -> Self {
        Self {
            context_passages,
            snippet_chars,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.context_passages, config.answer_snippet_chars)
    }

    /// Assemble the prompt.
    ///
    /// Passages are expected most relevant first. With no passages the
    /// prompt switches to the general-knowledge instruction; the question
    /// text is present either way.
    pub fn assemble(&self, question: &Question, passages: &[RetrievedPassage]) -> Prompt {
        let context = self.build_context(passages);

        if context.is_empty() {
            let user = format!("Question: {question}");
            return Prompt::new(GENERAL_KNOWLEDGE_SYSTEM_PROMPT, "", question.as_str(), user);
        }

        let user = format!("Context:\n{context}\n\nQuestion: {question}");
        Prompt::new(SYSTEM_PROMPT, context, question.as_str(), user)
    }

    /// Render the context block: one `Q: ... A: ...` entry per passage.
    fn build_context(&self, passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .take(self.context_passages)
            .map(|passage| {
                let snippet = truncate_chars(passage.text.trim(), self.snippet_chars);
                match passage.question() {
                    Some(q) if !q.trim().is_empty() => format!("Q: {} A: {}", q.trim(), snippet),
                    _ => snippet.to_string(),
                }
            })
            .filter(|entry| !entry.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Keep at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
