//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod prompt;

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use skyprompt_client::ServiceClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start a generation job and return immediately
    Submit {
        /// Prompt fragment; the current weather is appended by the server
        prompt: String,
    },
    /// Show the images of the latest job
    Images,
    /// Show the status of the latest job
    Status,
    /// Check that the server is reachable
    Health,
    /// Start a generation job and wait for its images
    Generate {
        /// Prompt fragment; the current weather is appended by the server
        prompt: String,

        /// Seconds between status checks
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = ServiceClient::new(&config.server_url);

    match command {
        Commands::Submit { prompt } => prompt::submit(&client, &prompt).await,
        Commands::Images => prompt::images(&client).await,
        Commands::Status => prompt::status(&client).await,
        Commands::Health => prompt::health(&client).await,
        Commands::Generate {
            prompt,
            interval,
            timeout,
        } => {
            prompt::generate(
                &client,
                &prompt,
                Duration::from_secs(interval),
                Duration::from_secs(timeout),
            )
            .await
        }
    }
}
