//! vvupload CLI - upload images and videos from the terminal
//!
//! Validates files, streams them to object storage with pause/resume, and
//! prints the committed URLs.

mod cli;
mod commands;
mod config_file;
mod console;
mod error;
mod probe;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::token::run_token;
use crate::commands::upload::run_upload;
use crate::commands::url::run_url;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "vvupload=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Upload(args) => run_upload(args, config_path).await?,
        Commands::Url {
            key,
            public,
            time_limit,
            json,
        } => run_url(&key, public, time_limit, json, config_path).await?,
        Commands::Delete { key } => run_delete(&key, config_path).await?,
        Commands::Token => run_token(config_path).await?,
        Commands::Config { command } => run_config(command, config_path)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
