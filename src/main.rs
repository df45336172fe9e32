//! nextscope: Next.js and React Server Components page analyzer.
//!
//! Entry point for the CLI and the HTTP API server.

mod adapters;
mod cli;
mod server;

use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = server::load_config(&cli.config)?;
    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    server::init_tracing(&config.logging)?;
    server::validate_config(&config)?;

    match cli.command {
        Commands::Analyze {
            url,
            force_fresh,
            format,
        } => server::run_analyze(config, &url, force_fresh, format).await,
        Commands::Serve { .. } => server::run_server(config).await,
    }
}
