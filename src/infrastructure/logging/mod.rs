//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or pretty console output on stdout or stderr
//! - Optional rolling JSON log files
//! - Secret scrubbing for upstream error text

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat, LogStream, RotationPolicy};
pub use logger::LoggerImpl;
pub use secret_scrubbing::scrub_secrets;
