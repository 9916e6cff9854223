//! Infrastructure adapters for external systems.

pub mod embeddings;
pub mod http;
pub mod inference;
pub mod mock;
pub mod postgres;
