//! Application state shared across handlers

use std::sync::Arc;

use application::ports::{CounterStore, JobQueue, LogStore, SearchIndex};
use application::services::{IngestService, ReconcileService};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The eleven public ingest/query operations
    pub ingest: Arc<IngestService>,
    /// Counter/index/count reconcilers, exposed for the `/health` handler
    pub reconcile: Arc<ReconcileService>,
    /// Durable Log Store, probed directly by `/health`
    pub log_store: Arc<dyn LogStore>,
    /// Counter Store, probed directly by `/health`
    pub counters: Arc<dyn CounterStore>,
    /// Job Queue, probed directly by `/health`
    pub queue: Arc<dyn JobQueue>,
    /// Search Index, probed directly by `/health`
    pub search: Arc<dyn SearchIndex>,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(
        log_store: Arc<dyn LogStore>,
        counters: Arc<dyn CounterStore>,
        queue: Arc<dyn JobQueue>,
        search: Arc<dyn SearchIndex>,
        config: Arc<AppConfig>,
    ) -> Self {
        let ingest = Arc::new(IngestService::new(
            Arc::clone(&counters),
            Arc::clone(&log_store),
            Arc::clone(&queue),
            Arc::clone(&search),
        ));
        let reconcile = Arc::new(ReconcileService::new(
            Arc::clone(&log_store),
            Arc::clone(&counters),
            Arc::clone(&search),
        ));

        Self {
            ingest,
            reconcile,
            log_store,
            counters,
            queue,
            search,
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
