//! Implementation of the `quantum-rag config` commands.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::output::{output, CommandOutput};
use crate::cli::types::ConfigCommands;
use crate::adapters::postgres::{pool_from_config, verify_connection};
use crate::domain::models::{Config, VectorStoreConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::scrub_secrets;

const REDACTED: &str = "[REDACTED]";

#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    pub config: serde_json::Value,
    /// Validation problems; empty when the config is usable.
    pub problems: Vec<String>,
}

impl CommandOutput for ConfigShowOutput {
    fn to_human(&self) -> String {
        let mut text = serde_yaml::to_string(&self.config).unwrap_or_default();
        if self.problems.is_empty() {
            text.push_str("\n# configuration is valid");
        } else {
            for problem in &self.problems {
                text.push_str(&format!("\n# problem: {problem}"));
            }
        }
        text
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigCheckOutput {
    pub valid: bool,
    pub vector_store: &'static str,
    pub custom_model_enabled: bool,
}

impl CommandOutput for ConfigCheckOutput {
    fn to_human(&self) -> String {
        let custom = if self.custom_model_enabled { "enabled" } else { "disabled" };
        format!(
            "Configuration is valid\nVector store: {}\nCustom model: {custom}",
            self.vector_store
        )
    }
}

pub async fn execute(command: ConfigCommands, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load_unchecked(config_path)?;
    let problems = problems(&config);

    match command {
        ConfigCommands::Show => {
            output(
                &ConfigShowOutput {
                    config: redacted(&config)?,
                    problems,
                },
                json_mode,
            );
            Ok(())
        }
        ConfigCommands::Check => {
            if !problems.is_empty() {
                anyhow::bail!("{}", problems.join("; "));
            }
            probe_vector_store(&config.vector_store).await?;
            output(
                &ConfigCheckOutput {
                    valid: true,
                    vector_store: "reachable",
                    custom_model_enabled: config.custom.endpoint().is_some(),
                },
                json_mode,
            );
            Ok(())
        }
    }
}

/// Open one connection to the vector store database.
pub async fn probe_vector_store(config: &VectorStoreConfig) -> Result<()> {
    let pool = pool_from_config(config)?;
    let result = verify_connection(&pool).await.context("Vector store is unreachable");
    pool.close().await;
    result
}

fn problems(config: &Config) -> Vec<String> {
    [
        ConfigLoader::validate(config).err(),
        ConfigLoader::require_credentials(config).err(),
    ]
    .into_iter()
    .flatten()
    .map(|e| e.to_string())
    .collect()
}

/// The config as JSON with credentials masked.
pub fn redacted(config: &Config) -> Result<serde_json::Value> {
    let mut config = config.clone();
    let mask = |value: &mut Option<String>| {
        if value.is_some() {
            *value = Some(REDACTED.to_string());
        }
    };
    mask(&mut config.embedding.api_key);
    mask(&mut config.groq.api_key);
    config.vector_store.database_url = config.vector_store.database_url.as_deref().map(scrub_secrets);

    Ok(serde_json::to_value(&config)?)
}
