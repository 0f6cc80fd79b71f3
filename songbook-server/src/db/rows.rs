//! Row types for the `songs` table and their domain conversions

use chrono::NaiveDate;
use songbook_core::models::{ReleaseDate, Song, Verse};
use sqlx::FromRow;

/// Song record from database
#[derive(Debug, Clone, FromRow)]
pub struct SongRow {
    pub id: i64,
    pub band: String,
    pub song: String,
    pub release: Option<NaiveDate>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Self {
            band_name: row.band,
            song_title: row.song,
            release_date: row.release.map(ReleaseDate::new),
            lyrics: non_empty(row.lyrics),
            link: non_empty(row.link),
        }
    }
}

/// One verse of a song, as produced by the verse query
#[derive(Debug, Clone, FromRow)]
pub struct VerseRow {
    pub band: String,
    pub song: String,
    /// 1-based ordinal from `WITH ORDINALITY`
    pub idx: i64,
    pub verse: String,
}

impl TryFrom<VerseRow> for Verse {
    type Error = sqlx::Error;

    fn try_from(row: VerseRow) -> Result<Self, Self::Error> {
        let verse = u32::try_from(row.idx).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Self {
            band_name: row.band,
            song_title: row.song,
            verse,
            text: row.verse,
        })
    }
}

/// Rows written before blank strings were normalised may hold `''`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
