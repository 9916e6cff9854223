//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quantum-rag")]
#[command(about = "Quantum computing question answering over retrieved Q&A passages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// YAML config file (defaults to ./quantum-rag.yaml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Answer one question and exit
    Ask(AskArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Inference backend: groq or custom
    #[arg(short, long, default_value = "groq")]
    pub model: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration with secrets redacted
    Show,

    /// Validate the effective configuration and connect to the vector store
    Check,
}
