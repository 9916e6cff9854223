//! quantum-rag - retrieval-augmented question answering for quantum computing
//!
//! A question is embedded, matched against stored Q&A passages in Postgres
//! (pgvector), folded into a prompt and answered by one of two inference
//! backends: Groq for fast hosted answers, or a custom model on Modal.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the ports the pipeline depends on
//! - **Service Layer** (`services`): Prompt assembly, retrieval, dispatch and orchestration
//! - **Adapters** (`adapters`): Voyage, pgvector, Groq, Modal and the HTTP surface
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging and wiring
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use quantum_rag::infrastructure::{build_query_service, config::ConfigLoader};
//! use quantum_rag::domain::models::ModelSelector;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load(None)?;
//!     let service = build_query_service(&config)?;
//!     let response = service.answer_question("What is a qubit?", ModelSelector::Groq).await?;
//!     println!("{}", response.answer);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{Collaborator, DomainError, DomainResult, UpstreamError};
pub use domain::models::{
    Config, HealthStatus, InferenceResult, ModelSelector, Prompt, QueryResponse, Question,
    RetrievedPassage,
};
pub use domain::ports::{EmbeddingProvider, InferenceBackend, PassageStore};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{InferenceDispatcher, PassageRetriever, PromptBuilder, QueryService};
