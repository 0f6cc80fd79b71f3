//! Verse addressing
//!
//! Lyrics are split into verses on blank lines: a newline, any run of
//! whitespace, then another newline. Leading and trailing blank lines are
//! trimmed first, so they never produce an empty verse. The server applies
//! the same trim and pattern in SQL, so both sides agree on verse numbering.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::song::{required_name, SongKey};
use super::ValidationError;

/// Verse separator, shared with the SQL `regexp_split_to_array` call
pub const VERSE_BREAK_PATTERN: &str = r"\n\s*\n";

/// Characters trimmed from both ends of the lyrics before splitting.
/// Mirrors the `btrim` set in the verse query.
pub const VERSE_TRIM: &[char] = &[' ', '\t', '\r', '\n'];

static VERSE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(VERSE_BREAK_PATTERN).expect("invalid verse regex"));

/// Split lyrics into verses in order.
pub fn split_verses(lyrics: &str) -> Vec<&str> {
    verses(lyrics).collect()
}

/// Verse at a 1-based index, if it exists.
pub fn verse_at(lyrics: &str, index: u32) -> Option<&str> {
    let offset = usize::try_from(index).ok()?.checked_sub(1)?;
    verses(lyrics).nth(offset)
}

fn verses(lyrics: &str) -> impl Iterator<Item = &str> {
    VERSE_BREAK
        .split(lyrics.trim_matches(VERSE_TRIM))
        .filter(|verse| !verse.is_empty())
}

/// Lookup key for a single verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongLyrics {
    pub key: SongKey,
    /// 1-based verse index
    pub verse: u32,
}

impl SongLyrics {
    pub fn new(key: SongKey, verse: u32) -> Result<Self, ValidationError> {
        if verse < 1 {
            return Err(ValidationError::OutOfRange {
                field: "verse",
                reason: "must be at least 1",
            });
        }
        Ok(Self { key, verse })
    }

    /// SQL OFFSET of the requested verse.
    pub fn offset(&self) -> i64 {
        i64::from(self.verse) - 1
    }
}

/// Query-string form of [`SongLyrics`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongLyricsParams {
    pub band_name: Option<String>,
    pub song_title: Option<String>,
    pub verse: Option<u32>,
}

impl TryFrom<SongLyricsParams> for SongLyrics {
    type Error = ValidationError;

    fn try_from(params: SongLyricsParams) -> Result<Self, Self::Error> {
        let key = SongKey {
            band_name: required_name("band_name", params.band_name)?,
            song_title: required_name("song_title", params.song_title)?,
        };
        let verse = params.verse.ok_or(ValidationError::Empty { field: "verse" })?;
        Self::new(key, verse)
    }
}

/// One verse of a song's lyrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub band_name: String,
    pub song_title: String,
    /// 1-based position within the lyrics
    pub verse: u32,
    pub text: String,
}
