//! CLI command implementations.

pub mod ask;
pub mod config;
pub mod serve;
