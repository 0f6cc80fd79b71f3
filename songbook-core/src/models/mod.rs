//! Domain models with validation at construction
//!
//! All client input is validated when converting the raw request types
//! (`*Request`, `*Params`) into these models. Invalid input returns
//! ValidationError, not panic.

pub mod validation;
pub mod pagination;
pub mod song;
pub mod filter;
pub mod lyrics;

pub use validation::ValidationError;
pub use pagination::{Page, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use song::{ReleaseDate, Song, SongKey, SongRequest, SongUpdate, RELEASE_DATE_FORMAT};
pub use filter::{SongFilter, SongFilterParams};
pub use lyrics::{split_verses, verse_at, SongLyrics, SongLyricsParams, Verse, VERSE_BREAK_PATTERN};
