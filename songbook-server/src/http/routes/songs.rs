//! Song endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use songbook_core::models::{Page, Song, SongRequest, Verse};

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidFilter, ValidVerseKey};
use crate::state::AppState;

/// Id of the song a mutation touched
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i64,
}

/// GET /songs - filtered, paginated search
async fn search_songs(
    State(state): State<AppState>,
    ValidFilter(filter): ValidFilter,
) -> Result<Json<Page<Song>>, ApiError> {
    let songs = state.store().search(&filter).await?;
    Ok(Json(Page::new(songs, filter.pagination)))
}

/// GET /song/text - one verse of a song's lyrics
async fn get_verse(
    State(state): State<AppState>,
    ValidVerseKey(lyrics): ValidVerseKey,
) -> Result<Json<Verse>, ApiError> {
    let verse = state.store().fetch_verse(&lyrics).await?;
    Ok(Json(verse))
}

/// DELETE /song/delete
async fn delete_song(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SongRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let key = req.into_key()?;
    let id = state.store().delete(&key).await?;
    Ok(Json(IdResponse { id }))
}

/// PUT /song/update
async fn update_song(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SongRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let (key, changes) = req.into_parts()?;
    let id = state.store().update(&key, &changes).await?;
    Ok(Json(IdResponse { id }))
}

/// POST /song/new
async fn add_song(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SongRequest>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let song = req.into_song()?;
    let id = state.store().insert(&song).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// Song routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/songs", get(search_songs))
        .route("/song/text", get(get_verse))
        .route("/song/delete", delete(delete_song))
        .route("/song/update", put(update_song))
        .route("/song/new", post(add_song))
}
