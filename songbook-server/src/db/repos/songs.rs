//! Song repository
//!
//! Each operation runs inside [`SongRepo::bounded`], so it is cancelled once
//! the operation deadline passes. Cancelling drops the open transaction,
//! which rolls it back.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use songbook_core::models::{Song, SongFilter, SongKey, SongLyrics, SongUpdate, Verse};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument, warn};

use super::SongStore;
use crate::db::query::{self, Assignment};
use crate::db::rows::{SongRow, VerseRow};
use crate::db::StoreError;

const OP_SEARCH: &str = "songs.search";
const OP_FETCH_VERSE: &str = "songs.fetch_verse";
const OP_DELETE: &str = "songs.delete";
const OP_UPDATE: &str = "songs.update";
const OP_INSERT: &str = "songs.insert";

/// PostgreSQL-backed [`SongStore`]
#[derive(Clone)]
pub struct SongRepo {
    pool: PgPool,
    op_timeout: Duration,
}

impl SongRepo {
    pub fn new(pool: PgPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self, op: &'static str) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.pool.begin().await.map_err(|e| StoreError::storage(op, e))
    }

    /// Run `work` under the operation deadline.
    async fn bounded<T>(
        &self,
        op: &'static str,
        work: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.op_timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                warn!(op, timeout = ?self.op_timeout, "operation deadline exceeded");
                Err(StoreError::Timeout {
                    op,
                    after: self.op_timeout,
                })
            }
        }
    }
}

/// Commit on success, roll back on error. Consumes the transaction, so the
/// decision is made exactly once. A failed rollback is logged and the
/// original error is returned.
async fn finish<T>(
    tx: Transaction<'static, Postgres>,
    op: &'static str,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            tx.commit().await.map_err(|e| StoreError::storage(op, e))?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(op, error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// `RETURNING id` with no row means the identity pair matched nothing.
fn returned_id(op: &'static str, result: Result<Option<i64>, sqlx::Error>) -> Result<i64, StoreError> {
    match result {
        Ok(Some(id)) => Ok(id),
        Ok(None) => Err(StoreError::SongNotFound { op }),
        Err(e) => Err(StoreError::classify(op, e)),
    }
}

#[async_trait]
impl SongStore for SongRepo {
    #[instrument(
        level = "debug",
        skip_all,
        fields(op = OP_SEARCH, title = ?filter.song_title, band = ?filter.band_name, page = filter.pagination.page)
    )]
    async fn search(&self, filter: &SongFilter) -> Result<Vec<Song>, StoreError> {
        self.bounded(OP_SEARCH, async {
            let mut tx = self.begin(OP_SEARCH).await?;
            let mut query = query::search(filter);
            let result = query
                .build_query_as::<SongRow>()
                .fetch_all(&mut *tx)
                .await
                .map(|rows| rows.into_iter().map(Song::from).collect::<Vec<_>>())
                .map_err(|e| StoreError::storage(OP_SEARCH, e));
            finish(tx, OP_SEARCH, result).await
        })
        .await
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(op = OP_FETCH_VERSE, band = %lyrics.key.band_name, song = %lyrics.key.song_title, verse = lyrics.verse)
    )]
    async fn fetch_verse(&self, lyrics: &SongLyrics) -> Result<Verse, StoreError> {
        self.bounded(OP_FETCH_VERSE, async {
            let mut tx = self.begin(OP_FETCH_VERSE).await?;
            let mut query = query::fetch_verse(lyrics);
            let result = match query.build_query_as::<VerseRow>().fetch_optional(&mut *tx).await {
                Ok(Some(row)) => {
                    Verse::try_from(row).map_err(|e| StoreError::storage(OP_FETCH_VERSE, e))
                }
                Ok(None) => Err(StoreError::SongNotFound { op: OP_FETCH_VERSE }),
                Err(e) => Err(StoreError::classify(OP_FETCH_VERSE, e)),
            };
            finish(tx, OP_FETCH_VERSE, result).await
        })
        .await
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(op = OP_DELETE, band = %key.band_name, song = %key.song_title)
    )]
    async fn delete(&self, key: &SongKey) -> Result<i64, StoreError> {
        self.bounded(OP_DELETE, async {
            let mut tx = self.begin(OP_DELETE).await?;
            let mut query = query::delete(key);
            let fetched = query
                .build_query_scalar::<i64>()
                .fetch_optional(&mut *tx)
                .await;
            let result = returned_id(OP_DELETE, fetched);
            finish(tx, OP_DELETE, result).await
        })
        .await
        .inspect(|id| debug!(id, "song deleted"))
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(op = OP_UPDATE, band = %key.band_name, song = %key.song_title)
    )]
    async fn update(&self, key: &SongKey, changes: &SongUpdate) -> Result<i64, StoreError> {
        let Some(assignment) = Assignment::select(changes) else {
            debug!("update carries no changes");
            return Err(StoreError::NoChanges { op: OP_UPDATE });
        };

        self.bounded(OP_UPDATE, async {
            let mut tx = self.begin(OP_UPDATE).await?;
            let mut query = query::update(key, assignment);
            let fetched = query
                .build_query_scalar::<i64>()
                .fetch_optional(&mut *tx)
                .await;
            let result = returned_id(OP_UPDATE, fetched);
            finish(tx, OP_UPDATE, result).await
        })
        .await
        .inspect(|id| debug!(id, ?assignment, "song updated"))
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(op = OP_INSERT, band = %song.band_name, song = %song.song_title)
    )]
    async fn insert(&self, song: &Song) -> Result<i64, StoreError> {
        self.bounded(OP_INSERT, async {
            let mut tx = self.begin(OP_INSERT).await?;
            let mut query = query::insert(song);
            let result = query
                .build_query_scalar::<i64>()
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::classify(OP_INSERT, e));
            finish(tx, OP_INSERT, result).await
        })
        .await
        .inspect(|id| debug!(id, "song inserted"))
    }
}
