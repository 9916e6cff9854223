//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Composition root wiring adapters into the query service

pub mod bootstrap;
pub mod config;
pub mod logging;

pub use bootstrap::build_query_service;
