//! Ports (trait seams) between the pipeline and its collaborators.

pub mod embedding;
pub mod inference_backend;
pub mod passage_store;

pub use embedding::EmbeddingProvider;
pub use inference_backend::InferenceBackend;
pub use passage_store::PassageStore;
