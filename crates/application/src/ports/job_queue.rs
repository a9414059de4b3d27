//! Job Queue port — persistent FIFO job broker

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::job::{Job, JobRecord};

/// Errors at the Job Queue boundary.
#[derive(Debug, Error)]
pub enum JobQueueError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("job not found: {0}")]
    NotFound(Uuid),
}

/// A persistent FIFO job broker carrying create/recount/reindex jobs.
///
/// The production adapter claims jobs with `SELECT ... FOR UPDATE SKIP
/// LOCKED` so a fixed-size worker pool can poll the same queue without
/// double-claiming a row.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue `job` on the default queue.
    async fn enqueue(&self, job: Job) -> Result<Uuid, JobQueueError>;

    /// Claim up to `limit` queued jobs, marking them as in-progress so a
    /// concurrent worker does not also claim them.
    async fn claim(&self, limit: usize) -> Result<Vec<JobRecord>, JobQueueError>;

    /// Remove a successfully processed job from the queue.
    async fn complete(&self, id: Uuid) -> Result<(), JobQueueError>;

    /// Record a failed attempt. Returns `true` if the job was rescheduled,
    /// `false` if it was moved to the dead-letter table because it exhausted
    /// its retry budget.
    async fn fail(&self, id: Uuid, error: &str) -> Result<bool, JobQueueError>;
}
