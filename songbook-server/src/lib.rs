//! songbook-server: HTTP API and PostgreSQL persistence for the song catalog
//!
//! The persistence core lives in [`db`]: it turns sparse filters and update
//! payloads into parameterized SQL, runs each operation in its own
//! transaction and classifies storage failures into [`db::StoreError`].
//! [`http`] is the thin axum layer on top.

pub mod db;
pub mod http;
pub mod state;

pub use db::{SongRepo, SongStore, StoreError};
pub use http::{build_router, run_server, ServerError};
pub use state::AppState;
