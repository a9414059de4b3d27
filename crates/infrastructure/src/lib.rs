#![forbid(unsafe_code)]
//! Infrastructure layer - Adapters for external systems
//!
//! Implements the ports defined in the `application` layer: the Durable Log
//! Store (Postgres), the Counter Store (Redis), the Job Queue (Postgres), and
//! the Search Index (Meilisearch). Each also has an in-memory adapter used
//! for local development and for driving tests without external services.

pub mod config;
pub mod counter;
pub mod jobqueue;
pub mod persistence;
pub mod reconcile;
pub mod retry;
pub mod scheduler;
pub mod search;
pub mod telemetry;
pub mod testing;

pub use config::{AppConfig, DatabaseConfig, KvConfig, SearchConfig, ServerConfig, WorkerConfig};
pub use counter::{InMemoryCounterStore, RedisCounterStore};
pub use jobqueue::{InMemoryJobQueue, PgJobQueue};
pub use persistence::{InMemoryLogStore, PgLogStore};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskEvent, TaskScheduler, TaskStats, TaskStatus, schedules};
pub use search::{InMemorySearchIndex, MeilisearchIndex};
pub use telemetry::{LogFormat, init_telemetry};
