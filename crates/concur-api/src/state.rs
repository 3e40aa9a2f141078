//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. The store handle is constructed once in
//! `main` and injected here; nothing is global.

use std::path::PathBuf;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use concur_manifest::ManifestStore;
use concur_store::{DocumentStore, MemoryStore};

use crate::config::AppConfig;

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub manifests: ManifestStore,
    pub config: Arc<AppConfig>,
    /// Renders `/metrics`. `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("manifests", &self.manifests)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: AppConfig) -> Self {
        Self {
            store,
            manifests: ManifestStore::new(config.manifest_dir.clone()),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// In-memory store with manifests under `manifest_dir`.
    pub fn in_memory(manifest_dir: impl Into<PathBuf>) -> Self {
        let config = AppConfig {
            manifest_dir: manifest_dir.into(),
            ..AppConfig::default()
        };
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
