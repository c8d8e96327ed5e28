//! Shared application state.
//!
//! The store and the geodata cache are owned here, built once at
//! startup and dropped at shutdown; handlers reach them through an
//! `Arc` rather than ambient globals.

use std::sync::Arc;

use anyhow::Context;
use vigia_sheets::auth::{Authenticator, ServiceAccountKey};
use vigia_sheets::memory::InMemoryBackend;
use vigia_sheets::store::StoreConfig;
use vigia_sheets::{HttpBackend, SheetsBackend, SheetsStore};

use crate::config::Config;

/// Everything the handlers share.
pub struct AppState {
    /// The worksheet store.
    pub store: SheetsStore,
    /// The boundary-dataset cache.
    pub geo: vigia_geo::BoundaryCache,
    /// The configuration the server started with.
    pub config: Config,
}

impl AppState {
    /// Build the state from configuration.
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let backend: Arc<dyn SheetsBackend> = match &config.service_account_file {
            Some(path) => {
                let key = ServiceAccountKey::from_file(path)
                    .with_context(|| format!("loading service account {}", path.display()))?;
                tracing::info!(sheet = %config.sheet_id, "using spreadsheet backend");
                Arc::new(HttpBackend::new(
                    Arc::new(Authenticator::new(key)),
                    config.sheet_id.clone(),
                ))
            }
            None => {
                tracing::warn!("no service-account file; using in-memory backend");
                Arc::new(InMemoryBackend::new())
            }
        };
        Ok(Self::with_backend(config, backend))
    }

    /// Build the state over an explicit backend (tests).
    pub fn with_backend(config: Config, backend: Arc<dyn SheetsBackend>) -> Arc<Self> {
        let store = SheetsStore::new(
            backend,
            StoreConfig {
                read_ttl: config.read_ttl(),
            },
        );
        Arc::new(Self {
            store,
            geo: vigia_geo::BoundaryCache::new(),
            config,
        })
    }
}
