//! quantum-rag CLI entry point.

use clap::Parser;

use quantum_rag::cli::commands::{ask, config, serve};
use quantum_rag::cli::{handle_error, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => serve::execute(args, config_path).await,
        Commands::Ask(args) => ask::execute(args, config_path, cli.json).await,
        Commands::Config(command) => config::execute(command, config_path, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
