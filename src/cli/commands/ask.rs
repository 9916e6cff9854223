//! Implementation of the `quantum-rag ask` command.
//!
//! Runs the pipeline once in-process, with the same wiring as the server.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::cli::{init_logging, CommandMode};
use crate::cli::output::{output, CommandOutput};
use crate::cli::types::AskArgs;
use crate::domain::models::QueryResponse;
use crate::infrastructure::build_query_service;
use crate::infrastructure::config::ConfigLoader;

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AskOutput(pub QueryResponse);

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let response = &self.0;
        let mut lines = vec![response.answer.clone()];

        if !response.sources.is_empty() {
            lines.push("\nSources:".to_string());
            for source in &response.sources {
                lines.push(format!(
                    "  [{:.4}] {} ({})",
                    source.score,
                    source.question().unwrap_or("-"),
                    source.source().unwrap_or("unknown")
                ));
            }
        }
        if let Some(suggested) = &response.suggested_question {
            lines.push(format!("\nYou might also ask: {suggested}"));
        }
        lines.push(format!(
            "\n{} in {}ms",
            response.model_used, response.response_time_ms
        ));
        lines.join("\n")
    }
}

pub async fn execute(args: AskArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let _logger = init_logging(&config.logging, CommandMode::OneShot)?;

    let service = build_query_service(&config)?;
    let response = service.answer_question_by_name(&args.question, &args.model).await?;

    output(&AskOutput(response), json_mode);
    Ok(())
}
