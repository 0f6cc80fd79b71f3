//! Storage error taxonomy
//!
//! Every variant carries the name of the operation that produced it.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by persistence operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit the (band, song) uniqueness constraint
    #[error("{op}: song already exists")]
    SongExists { op: &'static str },

    /// No row matched the identity pair (or the verse index)
    #[error("{op}: song not found")]
    SongNotFound { op: &'static str },

    /// Update carried no mutable field
    #[error("{op}: no changes")]
    NoChanges { op: &'static str },

    /// Operation exceeded its deadline and was cancelled
    #[error("{op}: timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// Any other database failure
    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Classify a low-level error raised while running `op`.
    ///
    /// - unique violation (SQLSTATE 23505) -> `SongExists`
    /// - no rows -> `SongNotFound`
    /// - anything else -> `Storage`
    pub fn classify(op: &'static str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::SongNotFound { op },
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::SongExists { op },
            source => Self::Storage { op, source },
        }
    }

    /// Wrap without classification (begin/commit failures).
    pub fn storage(op: &'static str, source: sqlx::Error) -> Self {
        Self::Storage { op, source }
    }

    /// Operation that produced the error.
    pub fn op(&self) -> &'static str {
        match self {
            Self::SongExists { op }
            | Self::SongNotFound { op }
            | Self::NoChanges { op }
            | Self::Timeout { op, .. }
            | Self::Storage { op, .. } => op,
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Storage { .. })
    }
}
