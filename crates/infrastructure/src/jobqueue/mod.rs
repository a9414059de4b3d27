//! Job Queue module
//!
//! A persistent FIFO broker carrying create/recount/reindex jobs between
//! the ingest front-end and the worker pool: Postgres in production,
//! in-memory for local development and tests.

mod in_memory_job_queue;
mod pg_job_queue;

pub use in_memory_job_queue::InMemoryJobQueue;
pub use pg_job_queue::PgJobQueue;
