//! Custom Axum extractors
//!
//! Decode failures become [`ApiError::Malformed`] and validation failures
//! [`ApiError::Validation`], so every rejection uses the JSON error shape.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use songbook_core::models::{SongFilter, SongFilterParams, SongLyrics, SongLyricsParams};

use super::error::ApiError;

/// Extract and validate a search filter from the query string
pub struct ValidFilter(pub SongFilter);

impl<S> FromRequestParts<S> for ValidFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<SongFilterParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Malformed {
                message: rejection.body_text(),
            })?;

        Ok(Self(SongFilter::try_from(params)?))
    }
}

/// Extract and validate a verse lookup from the query string
pub struct ValidVerseKey(pub SongLyrics);

impl<S> FromRequestParts<S> for ValidVerseKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<SongLyricsParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Malformed {
                message: rejection.body_text(),
            })?;

        Ok(Self(SongLyrics::try_from(params)?))
    }
}

/// JSON body whose decode errors are reported as JSON
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Malformed {
                message: rejection.body_text(),
            })?;

        Ok(Self(value))
    }
}
