//! Application state shared across handlers

use std::sync::Arc;

use crate::db::SongStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Box<dyn SongStore>,
}

impl AppState {
    pub fn new(store: impl SongStore + 'static) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store: Box::new(store),
            }),
        }
    }

    pub fn store(&self) -> &dyn SongStore {
        self.inner.store.as_ref()
    }
}
