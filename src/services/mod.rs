//! Pipeline services.

pub mod follow_up;
pub mod inference_dispatcher;
pub mod prompt_builder;
pub mod query_service;
pub mod retriever;

pub use follow_up::{similarity_ratio, suggest_follow_up};
pub use inference_dispatcher::InferenceDispatcher;
pub use prompt_builder::PromptBuilder;
pub use query_service::QueryService;
pub use retriever::PassageRetriever;
