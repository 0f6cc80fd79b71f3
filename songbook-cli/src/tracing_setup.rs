//! Tracing setup for the songbook CLI
//!
//! Usage:
//!   songbook --debug serve               # Debug logging to stderr
//!   RUST_LOG=songbook_server=trace ...   # Fine-grained log control
//!
//! Tracing is installed before the configuration is read, at the level of
//! the default environment. Once the configured environment is known the
//! filter is reloaded to its level (`debug` for local/dev, `info` for prod)
//! unless `RUST_LOG` or `--debug` pinned it.

use anyhow::{anyhow, Result};
use songbook_core::Environment;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Force debug logging (still overridden by an explicit RUST_LOG)
    pub debug: bool,
    /// Deployment environment, picks the default level
    pub env: Environment,
}

impl TracingConfig {
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            self.env.default_log_level()
        }
    }
}

/// Installed subscriber whose level can follow the loaded configuration
pub struct Tracing {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl Tracing {
    /// Install the global subscriber, writing to stderr.
    pub fn init(debug: bool) -> Result<Self> {
        let from_env = EnvFilter::try_from_default_env().ok();
        let pinned = debug || from_env.is_some();
        let filter = from_env.unwrap_or_else(|| {
            EnvFilter::new(
                TracingConfig {
                    debug,
                    ..Default::default()
                }
                .default_directive(),
            )
        });

        let (filter, handle) = reload::Layer::new(filter);
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(debug) // Show targets in debug mode
                    .compact(),
            )
            .try_init()
            .map_err(|err| anyhow!(err))?;

        Ok(Self { handle, pinned })
    }

    /// Switch to the configured environment's level unless pinned.
    pub fn follow(&self, config: &TracingConfig) -> Result<()> {
        if self.pinned {
            return Ok(());
        }
        self.handle
            .reload(EnvFilter::new(config.default_directive()))
            .map_err(|err| anyhow!(err))
    }
}
