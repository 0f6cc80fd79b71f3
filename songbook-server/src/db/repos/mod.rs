//! Repository implementations for database access
//!
//! Each operation follows the same shape:
//! - one transaction, one statement
//! - commit on success, rollback on any error (resolved exactly once)
//! - rely on DB constraints for uniqueness, no check-then-insert

pub mod songs;

use async_trait::async_trait;
use songbook_core::models::{Song, SongFilter, SongKey, SongLyrics, SongUpdate, Verse};

use super::StoreError;

pub use songs::SongRepo;

/// Song catalog operations, as seen by the HTTP layer
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Songs matching the filter, one page, in stable order.
    async fn search(&self, filter: &SongFilter) -> Result<Vec<Song>, StoreError>;

    /// Single verse of a song's lyrics.
    async fn fetch_verse(&self, lyrics: &SongLyrics) -> Result<Verse, StoreError>;

    /// Remove a song, returning its id.
    async fn delete(&self, key: &SongKey) -> Result<i64, StoreError>;

    /// Apply the highest-precedence change, returning the song's id.
    async fn update(&self, key: &SongKey, changes: &SongUpdate) -> Result<i64, StoreError>;

    /// Store a new song, returning the generated id.
    async fn insert(&self, song: &Song) -> Result<i64, StoreError>;
}
