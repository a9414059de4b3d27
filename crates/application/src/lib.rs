//! Application layer - use cases and orchestration
//!
//! Defines the ports the ingest front-end and workers depend on, and the
//! services (`IngestService`, `WorkerService`, `ReconcileService`) that
//! orchestrate domain objects against those ports. Contains no direct
//! dependency on any concrete backing store — adapters live in
//! `infrastructure`.

pub mod error;
pub mod job;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use job::{Job, JobRecord};
pub use ports::*;
pub use services::*;
