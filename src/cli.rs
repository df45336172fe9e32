//! CLI definitions for nextscope.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// nextscope CLI.
#[derive(Parser)]
#[command(name = "nextscope")]
#[command(about = "Next.js and React Server Components page analyzer")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Analyze a single URL and print the result
    Analyze {
        /// Page to analyze. A missing scheme defaults to https://
        url: String,

        /// Disable the browser cache for this analysis
        #[arg(long)]
        force_fresh: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the HTTP API server
    Serve {
        /// Server host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Text,
}
