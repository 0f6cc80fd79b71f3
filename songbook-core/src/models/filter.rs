//! Search filter

use serde::Deserialize;

use super::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use super::song::{optional_text, ReleaseDate};
use super::ValidationError;

/// Sparse search filter.
///
/// Every criterion is optional; the query builder decides which one applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub band_name: Option<String>,
    pub song_title: Option<String>,
    pub release_date: Option<ReleaseDate>,
    /// `true`: released after `release_date`; `false`: on or before it
    pub later: bool,
    pub pagination: Pagination,
}

impl SongFilter {
    pub fn has_criteria(&self) -> bool {
        self.band_name.is_some() || self.song_title.is_some() || self.release_date.is_some()
    }
}

/// Query-string form of [`SongFilter`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongFilterParams {
    pub band_name: Option<String>,
    pub song_title: Option<String>,
    pub release_date: Option<String>,
    #[serde(default, alias = "bigger")]
    pub later: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TryFrom<SongFilterParams> for SongFilter {
    type Error = ValidationError;

    fn try_from(params: SongFilterParams) -> Result<Self, Self::Error> {
        let pagination = Pagination::new(
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;

        let release_date = optional_text(params.release_date)
            .map(|raw| ReleaseDate::parse(&raw))
            .transpose()?;

        Ok(Self {
            band_name: optional_text(params.band_name),
            song_title: optional_text(params.song_title),
            release_date,
            later: params.later,
            pagination,
        })
    }
}
