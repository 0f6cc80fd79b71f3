//! SQL assembly for the `songs` table
//!
//! Every client value goes through `push_bind`; only fixed fragments are
//! pushed as text.
//!
//! Search and update each honour a single optional field, chosen by fixed
//! precedence:
//! - search: song title, then band name, then release date
//! - update: link, then lyrics, then release date
//!
//! Fields after the first present one are ignored, not combined.

use chrono::NaiveDate;
use songbook_core::models::{Song, SongFilter, SongKey, SongLyrics, SongUpdate, VERSE_BREAK_PATTERN};
use sqlx::{Postgres, QueryBuilder};

/// Columns read back into a song row
pub const SONG_COLUMNS: &str = "id, band, song, release, lyrics, link";

/// Verses returned per lookup
pub const VERSE_WINDOW: i64 = 1;

/// The one WHERE criterion a search applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPredicate<'a> {
    Title(&'a str),
    Band(&'a str),
    Released { date: NaiveDate, later: bool },
}

impl<'a> SearchPredicate<'a> {
    /// Pick the highest-precedence criterion present in the filter.
    pub fn select(filter: &'a SongFilter) -> Option<Self> {
        if let Some(title) = filter.song_title.as_deref() {
            return Some(Self::Title(title));
        }
        if let Some(band) = filter.band_name.as_deref() {
            return Some(Self::Band(band));
        }
        filter.release_date.map(|date| Self::Released {
            date: date.date(),
            later: filter.later,
        })
    }
}

/// The one column an update writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment<'a> {
    Link(&'a str),
    Lyrics(&'a str),
    ReleaseDate(NaiveDate),
}

impl<'a> Assignment<'a> {
    /// Pick the highest-precedence change present in the update.
    pub fn select(update: &'a SongUpdate) -> Option<Self> {
        if let Some(link) = update.link.as_deref() {
            return Some(Self::Link(link));
        }
        if let Some(lyrics) = update.lyrics.as_deref() {
            return Some(Self::Lyrics(lyrics));
        }
        update.release_date.map(|date| Self::ReleaseDate(date.date()))
    }
}

/// Escape LIKE metacharacters and wrap for substring matching.
pub fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// `SELECT` with at most one criterion, stable order and pagination.
pub fn search(filter: &SongFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(SONG_COLUMNS).push(" FROM songs");

    match SearchPredicate::select(filter) {
        Some(SearchPredicate::Title(title)) => {
            qb.push(" WHERE song LIKE ").push_bind(contains_pattern(title));
        }
        Some(SearchPredicate::Band(band)) => {
            qb.push(" WHERE band LIKE ").push_bind(contains_pattern(band));
        }
        Some(SearchPredicate::Released { date, later }) => {
            let op = if later { " WHERE release > " } else { " WHERE release <= " };
            qb.push(op).push_bind(date);
        }
        None => {}
    }

    qb.push(" ORDER BY id LIMIT ")
        .push_bind(filter.pagination.limit())
        .push(" OFFSET ")
        .push_bind(filter.pagination.offset());
    qb
}

/// Verse at the requested offset of the song's blank-line-split lyrics.
///
/// Lyrics are trimmed of surrounding blank lines first, and an empty
/// remainder yields no verse.
pub fn fetch_verse(lyrics: &SongLyrics) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT s.band, s.song, v.idx, v.verse FROM songs s \
         CROSS JOIN LATERAL unnest(regexp_split_to_array(btrim(s.lyrics, E' \\t\\r\\n'), ",
    );
    qb.push_bind(VERSE_BREAK_PATTERN)
        .push(")) WITH ORDINALITY AS v(verse, idx)");
    push_identity(&mut qb, "s.", &lyrics.key);
    qb.push(" AND v.verse <> '' ORDER BY v.idx LIMIT ")
        .push_bind(VERSE_WINDOW)
        .push(" OFFSET ")
        .push_bind(lyrics.offset());
    qb
}

/// `DELETE ... RETURNING id` for the identity pair.
pub fn delete(key: &SongKey) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("DELETE FROM songs");
    push_identity(&mut qb, "", key);
    qb.push(" RETURNING id");
    qb
}

/// `UPDATE ... RETURNING id` writing a single column and the timestamp.
pub fn update(key: &SongKey, assignment: Assignment<'_>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE songs SET updated = NOW(), ");
    match assignment {
        Assignment::Link(link) => {
            qb.push("link = ").push_bind(link.to_owned());
        }
        Assignment::Lyrics(lyrics) => {
            qb.push("lyrics = ").push_bind(lyrics.to_owned());
        }
        Assignment::ReleaseDate(date) => {
            qb.push("release = ").push_bind(date);
        }
    }
    push_identity(&mut qb, "", key);
    qb.push(" RETURNING id");
    qb
}

/// `INSERT ... RETURNING id` with every provided field.
pub fn insert(song: &Song) -> QueryBuilder<'static, Postgres> {
    let mut qb =
        QueryBuilder::new("INSERT INTO songs (band, song, release, lyrics, link, updated) VALUES (");
    let mut values = qb.separated(", ");
    values
        .push_bind(song.band_name.clone())
        .push_bind(song.song_title.clone())
        .push_bind(song.release_date.map(|d| d.date()))
        .push_bind(song.lyrics.clone())
        .push_bind(song.link.clone())
        .push("NOW()");
    qb.push(") RETURNING id");
    qb
}

fn push_identity(qb: &mut QueryBuilder<'static, Postgres>, alias: &str, key: &SongKey) {
    qb.push(" WHERE ")
        .push(alias)
        .push("band = ")
        .push_bind(key.band_name.clone())
        .push(" AND ")
        .push(alias)
        .push("song = ")
        .push_bind(key.song_title.clone());
}
