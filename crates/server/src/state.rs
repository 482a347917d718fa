//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::db::DocumentStore;
use crate::services::AdminGate;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    store: DocumentStore,
    gate: AdminGate,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The authorization gate is configured from `config.superuser_email`.
    #[must_use]
    pub fn new(config: SiteConfig, store: DocumentStore) -> Self {
        let gate = AdminGate::new(config.superuser_email.as_deref());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                gate,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get a reference to the authorization gate.
    #[must_use]
    pub fn gate(&self) -> &AdminGate {
        &self.inner.gate
    }
}
