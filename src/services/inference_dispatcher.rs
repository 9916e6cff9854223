//! Inference dispatch
//!
//! Routes a prompt to the backend named by the [`ModelSelector`]. A failure
//! on the selected backend is returned as-is; there is no fallback to the
//! other backend.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{InferenceResult, ModelSelector, Prompt};
use crate::domain::ports::InferenceBackend;

/// Holds one backend per selector.
pub struct InferenceDispatcher {
    groq: Arc<dyn InferenceBackend>,
    custom: Option<Arc<dyn InferenceBackend>>,
}

impl InferenceDispatcher {
    /// # Arguments
    /// * `groq` - Fast hosted backend, always present
    /// * `custom` - Custom-model backend, `None` when no endpoint is configured
    ///
    /// # Errors
    /// Fails when a backend is wired into the slot of the other selector.
    pub fn new(groq: Arc<dyn InferenceBackend>, custom: Option<Arc<dyn InferenceBackend>>) -> anyhow::Result<Self> {
        let slots = std::iter::once((ModelSelector::Groq, &groq))
            .chain(custom.iter().map(|backend| (ModelSelector::Custom, backend)));
        for (slot, backend) in slots {
            let answers_to = backend.selector();
            if answers_to != slot {
                anyhow::bail!("{answers_to} backend wired as the {slot} backend");
            }
        }
        Ok(Self { groq, custom })
    }

    /// Whether a backend is wired up for this selector.
    pub fn is_available(&self, model: ModelSelector) -> bool {
        match model {
            ModelSelector::Groq => true,
            ModelSelector::Custom => self.custom.is_some(),
        }
    }

    /// Resolve the backend for a selector.
    ///
    /// Fails with a validation error when the custom backend is selected but
    /// not configured.
    pub fn backend(&self, model: ModelSelector) -> DomainResult<&Arc<dyn InferenceBackend>> {
        match model {
            ModelSelector::Groq => Ok(&self.groq),
            ModelSelector::Custom => self
                .custom
                .as_ref()
                .ok_or_else(|| DomainError::validation("Custom model not configured")),
        }
    }

    /// Generate an answer with the selected backend.
    pub async fn generate(&self, prompt: &Prompt, model: ModelSelector) -> DomainResult<InferenceResult> {
        let backend = self.backend(model)?;

        info!(model = %model, grounded = prompt.is_grounded(), "dispatching prompt");

        let mut result = backend.generate(prompt).await.map_err(|err| {
            warn!(model = %model, error = %err, "inference backend failed");
            err
        })?;

        result.answer = result.answer.trim().to_string();
        info!(model = %model, latency_ms = result.latency_ms, "inference completed");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockInferenceBackend;
    use crate::domain::errors::{Collaborator, UpstreamError};
    use crate::domain::models::Question;
    use crate::services::PromptBuilder;
    use std::time::Duration;

    fn prompt() -> Prompt {
        PromptBuilder::default().assemble(&Question::new("What is a qubit?").unwrap(), &[])
    }

    fn backends() -> (Arc<MockInferenceBackend>, Arc<MockInferenceBackend>) {
        (
            Arc::new(MockInferenceBackend::answering(ModelSelector::Groq, "fast answer", 5)),
            Arc::new(MockInferenceBackend::answering(ModelSelector::Custom, "  custom answer\n", 5)),
        )
    }

    #[tokio::test]
    async fn test_routes_to_selected_backend() {
        let (groq, custom) = backends();
        let dispatcher = InferenceDispatcher::new(groq.clone(), Some(custom.clone())).unwrap();

        let result = dispatcher.generate(&prompt(), ModelSelector::Groq).await.unwrap();
        assert_eq!(result.answer, "fast answer");
        assert_eq!((groq.call_count(), custom.call_count()), (1, 0));

        let result = dispatcher.generate(&prompt(), ModelSelector::Custom).await.unwrap();
        assert_eq!(result.answer, "custom answer");
        assert_eq!((groq.call_count(), custom.call_count()), (1, 1));
    }

    #[test]
    fn test_backends_must_match_their_slot() {
        let (groq, custom) = backends();

        assert!(InferenceDispatcher::new(custom.clone(), None).is_err());
        assert!(InferenceDispatcher::new(groq.clone(), Some(groq.clone())).is_err());
        assert!(InferenceDispatcher::new(groq, Some(custom)).is_ok());
    }

    #[tokio::test]
    async fn test_unconfigured_custom_backend() {
        let (groq, _) = backends();
        let dispatcher = InferenceDispatcher::new(groq.clone(), None).unwrap();

        assert!(!dispatcher.is_available(ModelSelector::Custom));
        let err = dispatcher.generate(&prompt(), ModelSelector::Custom).await.unwrap_err();
        assert_eq!(err, DomainError::validation("Custom model not configured"));
        assert_eq!(groq.call_count(), 0);
    }

    #[tokio::test]
    async fn test_no_fallback_on_failure() {
        let groq = Arc::new(MockInferenceBackend::answering(ModelSelector::Groq, "unused", 1));
        let custom = Arc::new(MockInferenceBackend::failing(
            ModelSelector::Custom,
            UpstreamError::timeout(Collaborator::Custom, Duration::from_secs(300)),
        ));
        let dispatcher = InferenceDispatcher::new(groq.clone(), Some(custom.clone())).unwrap();

        let err = dispatcher.generate(&prompt(), ModelSelector::Custom).await.unwrap_err();
        assert_eq!(err.collaborator(), Some(Collaborator::Custom));
        assert_eq!(custom.call_count(), 1);
        assert_eq!(groq.call_count(), 0);
    }
}
