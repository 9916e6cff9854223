use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::adapters::postgres::passage_store::is_valid_table_name;
use crate::domain::models::config::Config;

/// Config file read from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "quantum-rag.yaml";

/// Prefix for structured environment overrides (`QRAG_RETRIEVAL__TOP_K=8`).
pub const ENV_PREFIX: &str = "QRAG_";

/// Well-known environment variables and the config keys they set.
pub const RAW_ENV_KEYS: &[(&str, &str)] = &[
    ("VOYAGE_API_KEY", "embedding.api_key"),
    ("DATABASE_URL", "vector_store.database_url"),
    ("GROQ_API_KEY", "groq.api_key"),
    ("MODAL_URL", "custom.url"),
    ("PORT", "server.port"),
];

/// Configuration error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid {0}: must be at least 1")]
    ZeroValue(&'static str),

    #[error("Invalid {0}: timeout must be at least 1 second")]
    ZeroTimeout(&'static str),

    #[error("custom.timeout_secs ({custom}) must be larger than groq.timeout_secs ({groq})")]
    CustomTimeoutTooShort { custom: u64, groq: u64 },

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid vector_store.table: '{0}'. Must be a plain or schema-qualified identifier")]
    InvalidTableName(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and fully validate configuration.
    ///
    /// Reads `.env` first, then merges (lowest to highest precedence):
    /// 1. Programmatic defaults
    /// 2. `path`, or `quantum-rag.yaml` in the working directory if present
    /// 3. Well-known variables (`VOYAGE_API_KEY`, `DATABASE_URL`, ...)
    /// 4. `QRAG_*` variables, `__` separating nested keys
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = Self::load_unchecked(path)?;
        Self::validate(&config)?;
        Self::require_credentials(&config)?;
        Ok(config)
    }

    /// Load without validation, for inspecting a partial setup.
    pub fn load_unchecked(path: Option<&Path>) -> Result<Config> {
        if let Ok(dotenv) = dotenvy::dotenv() {
            tracing::debug!(path = %dotenv.display(), "loaded .env");
        }
        Self::figment(path)?
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// The layered figment, before extraction.
    pub fn figment(path: Option<&Path>) -> Result<Figment, ConfigError> {
        let file = match path {
            Some(path) if !path.exists() => return Err(ConfigError::FileNotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        Ok(Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(raw_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Validate value ranges and formats.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let retrieval = &config.retrieval;
        for (name, value) in [
            ("retrieval.top_k", retrieval.top_k),
            ("retrieval.context_passages", retrieval.context_passages),
            ("embedding.dimension", config.embedding.dimension),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroValue(name));
            }
        }

        if config.vector_store.max_connections == 0 {
            return Err(ConfigError::ZeroValue("vector_store.max_connections"));
        }
        if config.groq.max_tokens == 0 {
            return Err(ConfigError::ZeroValue("groq.max_tokens"));
        }

        for (name, secs) in [
            ("embedding.timeout_secs", config.embedding.timeout_secs),
            ("vector_store.acquire_timeout_secs", config.vector_store.acquire_timeout_secs),
            ("vector_store.query_timeout_secs", config.vector_store.query_timeout_secs),
            ("groq.timeout_secs", config.groq.timeout_secs),
            ("custom.timeout_secs", config.custom.timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }

        if config.custom.timeout_secs <= config.groq.timeout_secs {
            return Err(ConfigError::CustomTimeoutTooShort {
                custom: config.custom.timeout_secs,
                groq: config.groq.timeout_secs,
            });
        }

        if !is_valid_table_name(&config.vector_store.table) {
            return Err(ConfigError::InvalidTableName(config.vector_store.table.clone()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        Ok(())
    }

    /// Fail listing every missing credential at once.
    pub fn require_credentials(config: &Config) -> Result<(), ConfigError> {
        let is_set = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

        let missing: Vec<&'static str> = [
            ("VOYAGE_API_KEY", is_set(&config.embedding.api_key)),
            ("DATABASE_URL", is_set(&config.vector_store.database_url)),
            ("GROQ_API_KEY", is_set(&config.groq.api_key)),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredentials(missing))
        }
    }
}

/// Environment provider for the well-known unprefixed variables.
fn raw_env() -> Env {
    let names: Vec<&str> = RAW_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        RAW_ENV_KEYS
            .iter()
            .find(|(name, _)| key == *name)
            .map_or_else(|| key.as_str().to_string(), |(_, path)| (*path).to_string())
            .into()
    })
}
