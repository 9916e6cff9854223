//! Generation backends.

pub mod groq;
pub mod modal;

pub use groq::GroqBackend;
pub use modal::ModalBackend;
