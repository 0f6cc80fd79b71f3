//! songbook-core: domain types for the song catalog
//!
//! Holds everything that does not touch the database or the network:
//! - validated models (songs, filters, verse lookups, pagination)
//! - verse splitting rules
//! - service configuration

pub mod config;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, Environment, ServerSettings, SongbookConfig};
pub use models::ValidationError;
