use std::sync::Arc;

use lumn_core::{Collections, DocumentStore};

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: DocumentStore,
    collections: Collections,
    config: AppConfig,
}

impl AppState {
    pub fn new(store: DocumentStore, config: AppConfig) -> Self {
        Self {
            inner: Arc::new(InnerState {
                collections: Collections::new(store.clone()),
                store,
                config,
            }),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    pub fn collections(&self) -> &Collections {
        &self.inner.collections
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }
}
