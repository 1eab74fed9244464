//! Catalog Gateway Entry Point

use clap::Parser;
use catalog_gateway::cli::{self, Cli, Commands};
use catalog_gateway::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("failed to initialize logging: {e}");
    }

    match cli.command {
        Some(Commands::Invoke(args)) => cli::invoke::execute(&args).await,
        Some(Commands::Serve(args)) => cli::serve::execute(&args).await,
        None => cli::serve::execute(&cli::serve::ServeArgs::default()).await,
    }
}
