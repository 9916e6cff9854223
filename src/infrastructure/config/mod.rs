//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides (well-known names and `QRAG_*`)
//! - Configuration validation

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, DEFAULT_CONFIG_FILE};
