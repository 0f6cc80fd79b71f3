//! HTTP server command
//!
//! Resolves configuration, opens the pool and runs the song catalog API
//! until a shutdown signal arrives.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use songbook_core::SongbookConfig;
use songbook_server::db::create_pool;
use songbook_server::run_server;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config, default 127.0.0.1:8080)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl ServeArgs {
    /// Command-line flags take precedence over file and environment values.
    fn apply(&self, config: &mut SongbookConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        config.apply_overrides(self.database_url.clone(), None);
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: SongbookConfig) -> Result<()> {
    args.apply(&mut config);

    tracing::info!(bind = %config.server.bind, env = ?config.env, "starting songbook server");

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    // Blocks until shutdown
    run_server(pool, &config).await.context("Server error")?;

    Ok(())
}
