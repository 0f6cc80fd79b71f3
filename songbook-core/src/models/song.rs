//! Song records and the payloads that carry them
//!
//! Optional text fields treat blank strings as absent, so `""` from a client
//! never reaches the store as a value.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::ValidationError;

/// Maximum length for band names and song titles
pub const MAX_NAME_LEN: usize = 255;

/// Wire format for release dates
pub const RELEASE_DATE_FORMAT: &str = "%d.%m.%Y";

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("invalid link regex"));

/// Calendar release date, rendered as `DD.MM.YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseDate(NaiveDate);

impl ReleaseDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a `DD.MM.YYYY` string.
    ///
    /// # Example
    /// ```
    /// use songbook_core::models::ReleaseDate;
    ///
    /// let date = ReleaseDate::parse("06.08.1965").unwrap();
    /// assert_eq!(date.to_string(), "06.08.1965");
    /// assert!(ReleaseDate::parse("1965-08-06").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        NaiveDate::parse_from_str(s.trim(), RELEASE_DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "release_date",
                reason: "expected a date in DD.MM.YYYY format",
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ReleaseDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RELEASE_DATE_FORMAT))
    }
}

impl FromStr for ReleaseDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ReleaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReleaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Natural key of a song: (band name, song title)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongKey {
    pub band_name: String,
    pub song_title: String,
}

impl SongKey {
    /// Create a key, validating that both parts are present and bounded.
    pub fn new(band_name: &str, song_title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            band_name: required_name("band_name", Some(band_name.to_owned()))?,
            song_title: required_name("song_title", Some(song_title.to_owned()))?,
        })
    }
}

/// A stored song record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub band_name: String,
    pub song_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<ReleaseDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Song {
    pub fn new(key: SongKey) -> Self {
        Self {
            band_name: key.band_name,
            song_title: key.song_title,
            release_date: None,
            lyrics: None,
            link: None,
        }
    }

    pub fn key(&self) -> SongKey {
        SongKey {
            band_name: self.band_name.clone(),
            song_title: self.song_title.clone(),
        }
    }
}

/// Mutable fields of a song; `None` means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongUpdate {
    pub link: Option<String>,
    pub lyrics: Option<String>,
    pub release_date: Option<ReleaseDate>,
}

impl SongUpdate {
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.lyrics.is_none() && self.release_date.is_none()
    }
}

/// Raw song payload as it arrives over the wire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongRequest {
    pub band_name: Option<String>,
    pub song_title: Option<String>,
    pub release_date: Option<String>,
    pub lyrics: Option<String>,
    pub link: Option<String>,
}

impl SongRequest {
    /// Validate only the identity pair.
    pub fn into_key(self) -> Result<SongKey, ValidationError> {
        Ok(SongKey {
            band_name: required_name("band_name", self.band_name)?,
            song_title: required_name("song_title", self.song_title)?,
        })
    }

    /// Validate a full record for insertion.
    pub fn into_song(self) -> Result<Song, ValidationError> {
        let (key, update) = self.into_parts()?;
        Ok(Song {
            band_name: key.band_name,
            song_title: key.song_title,
            release_date: update.release_date,
            lyrics: update.lyrics,
            link: update.link,
        })
    }

    /// Split into the identity pair and the requested changes.
    pub fn into_parts(self) -> Result<(SongKey, SongUpdate), ValidationError> {
        let key = SongKey {
            band_name: required_name("band_name", self.band_name)?,
            song_title: required_name("song_title", self.song_title)?,
        };

        let release_date = optional_text(self.release_date)
            .map(|raw| ReleaseDate::parse(&raw))
            .transpose()?;
        let link = optional_text(self.link).map(validate_link).transpose()?;

        let update = SongUpdate {
            link,
            lyrics: optional_text(self.lyrics),
            release_date,
        };

        Ok((key, update))
    }
}

/// Blank strings count as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub(crate) fn required_name(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    let value = optional_text(value).ok_or(ValidationError::Empty { field })?;

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(value)
}

fn validate_link(link: String) -> Result<String, ValidationError> {
    let trimmed = link.trim();
    if !LINK_RE.is_match(trimmed) {
        return Err(ValidationError::InvalidFormat {
            field: "link",
            reason: "must be an absolute http(s) URL",
        });
    }
    Ok(trimmed.to_owned())
}
