//! Domain models for the question-answering pipeline.

pub mod config;
pub mod inference;
pub mod passage;
pub mod query;
pub mod question;

pub use config::{
    Config, CustomModelConfig, EmbeddingConfig, GroqConfig, LoggingConfig, RetrievalConfig,
    ServerConfig, SimilarityMetric, VectorStoreConfig,
};
pub use inference::{InferenceResult, Prompt};
pub use passage::{sort_by_score_desc, EmbeddingVector, RetrievedPassage, META_QUESTION, META_SOURCE};
pub use query::{HealthStatus, QueryResponse};
pub use question::{ModelSelector, Question};
