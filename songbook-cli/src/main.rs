//! songbook CLI - song catalog service
//!
//! - `serve` runs the HTTP API backed by PostgreSQL
//! - `config` inspects the resolved configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use songbook_core::SongbookConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "songbook",
    author,
    version,
    about = "Song catalog service: search songs, read verses, manage records"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Path to the TOML config file (default: ~/.songbook/config.toml)
    #[arg(long, short = 'c', global = true, env = "SONGBOOK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let tracing = match tracing_setup::Tracing::init(cli.debug) {
        Ok(tracing) => Some(tracing),
        Err(err) => {
            eprintln!("warning: logging disabled: {err}");
            None
        }
    };

    let config = SongbookConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(tracing) = &tracing {
        let level = tracing_setup::TracingConfig {
            debug: cli.debug,
            env: config.env,
        };
        if let Err(err) = tracing.follow(&level) {
            eprintln!("warning: could not apply configured log level: {err}");
        }
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::Config(args) => commands::run_config(args, &config)?,
    }
    Ok(())
}
