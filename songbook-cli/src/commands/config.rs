//! Configuration inspection commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use songbook_core::SongbookConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration with credentials redacted
    Show,
    /// Show the default config file path
    Path,
}

pub fn run_config(args: ConfigArgs, config: &SongbookConfig) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let rendered = config
                .to_redacted_toml()
                .context("Failed to render configuration")?;
            print!("{rendered}");
        }
        ConfigCommands::Path => {
            println!("{}", SongbookConfig::default_path().display());
        }
    }
    Ok(())
}
