//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{AskArgs, Cli, Commands, ConfigCommands, ServeArgs};

use anyhow::Result;

use crate::domain::models::LoggingConfig;
use crate::infrastructure::logging::{scrub_secrets, LogConfig, LogStream, LoggerImpl};

/// How a command uses the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    /// Long-running; logs go to stdout at the configured level.
    Service,
    /// Prints one result to stdout; only warnings and errors are logged,
    /// and to stderr.
    OneShot,
}

/// Logger settings for a command, derived from the `logging` section.
///
/// `RUST_LOG` still wins over the level chosen here.
pub fn command_log_config(config: &LoggingConfig, mode: CommandMode) -> Result<LogConfig> {
    let mut log_config = LogConfig::try_from(config)?;
    if mode == CommandMode::OneShot {
        log_config.level = "warn".to_string();
        log_config.stream = LogStream::Stderr;
    }
    Ok(log_config)
}

/// Install the global logger for a command.
pub fn init_logging(config: &LoggingConfig, mode: CommandMode) -> Result<LoggerImpl> {
    LoggerImpl::init(&command_log_config(config, mode)?)
}

/// Report a command failure and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let message = error_message(&err);
    if json_mode {
        let body = serde_json::json!({ "error": message });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {message}");
    }
    std::process::exit(1)
}

/// The error and its causes on one line, secrets redacted.
pub fn error_message(err: &anyhow::Error) -> String {
    scrub_secrets(&format!("{err:#}"))
}
