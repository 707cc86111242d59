//! Skyprompt CLI
//!
//! Command-line interface for submitting prompts to a Skyprompt server and
//! collecting the generated images.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "skyprompt")]
#[command(about = "Weather-aware image generation CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "SKYPROMPT_SERVER_URL", default_value = "http://localhost:5000")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}
