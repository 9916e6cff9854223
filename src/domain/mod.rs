//! Domain layer for the question-answering pipeline
//!
//! Pure models, error taxonomy and the ports the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{Collaborator, DomainError, DomainResult, UpstreamError, UpstreamFailure};
