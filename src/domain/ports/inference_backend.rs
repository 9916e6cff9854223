//! Inference backend port.
//!
//! Both generation backends implement the same capability. The dispatcher
//! picks one by [`ModelSelector`] and never falls back to the other.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{InferenceResult, ModelSelector, Prompt};

/// A text generation backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Selector this backend answers to.
    fn selector(&self) -> ModelSelector;

    /// Generate an answer for the prompt.
    ///
    /// Implementations normalize their wire response into [`InferenceResult`],
    /// trim the answer, and enforce their own timeout.
    async fn generate(&self, prompt: &Prompt) -> DomainResult<InferenceResult>;
}
