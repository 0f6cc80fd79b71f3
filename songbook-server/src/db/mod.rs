//! Database layer - connection pool, query assembly and repositories
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits, passed in, never global
//! - One statement per transaction, committed or rolled back exactly once
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Client values are always bound parameters

pub mod error;
pub mod pool;
pub mod query;
pub mod repos;
pub mod rows;

pub use error::StoreError;
pub use pool::{connect_options, create_pool};
pub use repos::{SongRepo, SongStore};
