//! Application services - use case implementations

mod ingest_service;
mod reconcile_service;
mod worker_service;

pub use ingest_service::IngestService;
pub use reconcile_service::ReconcileService;
pub use worker_service::WorkerService;
