//! Implementation of the `quantum-rag serve` command.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::adapters::http::{shutdown_signal, QueryHttpConfig, QueryHttpServer};
use crate::cli::{init_logging, CommandMode};
use crate::cli::types::ServeArgs;
use crate::infrastructure::build_query_service;
use crate::infrastructure::config::ConfigLoader;

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ConfigLoader::load(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _logger = init_logging(&config.logging, CommandMode::Service)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting quantum-rag");

    let service = Arc::new(build_query_service(&config)?);
    QueryHttpServer::new(service, QueryHttpConfig::from(&config.server))
        .serve_with_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}
