//! In-memory Job Queue adapter, for local development and tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use application::job::{Job, JobRecord};
use application::ports::{JobQueue, JobQueueError};

use crate::retry::RetryConfig;

/// A queued job paired with the earliest time it may be claimed.
#[derive(Debug, Clone)]
struct Scheduled {
    record: JobRecord,
    ready_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    queued: Vec<Scheduled>,
    claimed: Vec<JobRecord>,
    dead_letter: Vec<JobRecord>,
}

/// In-process, `Mutex`-guarded implementation of [`JobQueue`].
#[derive(Debug)]
pub struct InMemoryJobQueue {
    state: Mutex<State>,
    retry_config: RetryConfig,
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self {
            state: Mutex::new(State::default()),
            retry_config: RetryConfig::default(),
        }
    }
}

impl InMemoryJobQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(retry_config: RetryConfig) -> Self {
        Self {
            state: Mutex::new(State::default()),
            retry_config,
        }
    }

    /// Number of jobs currently in the dead-letter table. Exposed for tests.
    pub fn dead_letter_count(&self) -> usize {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).dead_letter.len()
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, job: Job) -> Result<Uuid, JobQueueError> {
        let record = JobRecord::new(job);
        let id = record.id;
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.queued.push(Scheduled { record, ready_at: Utc::now() });
        Ok(id)
    }

    async fn claim(&self, limit: usize) -> Result<Vec<JobRecord>, JobQueueError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();
        let mut claimed = Vec::new();
        let mut remaining = Vec::with_capacity(state.queued.len());
        for scheduled in state.queued.drain(..) {
            if claimed.len() < limit && scheduled.ready_at <= now {
                claimed.push(scheduled.record);
            } else {
                remaining.push(scheduled);
            }
        }
        state.queued = remaining;
        state.claimed.extend(claimed.iter().cloned());
        Ok(claimed)
    }

    async fn complete(&self, id: Uuid) -> Result<(), JobQueueError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let before = state.claimed.len();
        state.claimed.retain(|r| r.id != id);
        if state.claimed.len() == before {
            return Err(JobQueueError::NotFound(id));
        }
        Ok(())
    }

    async fn fail(&self, id: Uuid, _error: &str) -> Result<bool, JobQueueError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let position = state
            .claimed
            .iter()
            .position(|r| r.id == id)
            .ok_or(JobQueueError::NotFound(id))?;

        let mut record = state.claimed.remove(position);
        record.attempts += 1;

        if record.attempts >= self.retry_config.max_retries {
            state.dead_letter.push(record);
            return Ok(false);
        }

        let delay = self.retry_config.delay_for_attempt(record.attempts);
        let ready_at = Utc::now()
            + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());
        state.queued.push(Scheduled { record, ready_at });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::value_objects::AppId;

    #[tokio::test]
    async fn enqueue_then_claim_round_trips() {
        let queue = InMemoryJobQueue::new();
        let id = queue
            .enqueue(Job::RecomputeAppCount {
                application_id: AppId::new(),
            })
            .await
            .unwrap();

        let claimed = queue.claim(10).await.unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, id);
    }

    #[tokio::test]
    async fn fail_moves_to_dead_letter_after_max_retries() {
        let queue = InMemoryJobQueue::with_config(RetryConfig {
            max_retries: 1,
            ..RetryConfig::default()
        });
        let id = queue.enqueue(Job::ReindexAll).await.unwrap();
        queue.claim(10).await.unwrap();

        let retried = queue.fail(id, "boom").await.unwrap();
        assert!(!retried);
        assert_eq!(queue.dead_letter_count(), 1);
    }

    #[tokio::test]
    async fn fail_defers_reclaim_until_backoff_elapses() {
        let queue = InMemoryJobQueue::with_config(
            RetryConfig::new(50, 1000, 2.0, 5).without_jitter(),
        );
        let id = queue.enqueue(Job::ReindexAll).await.unwrap();
        queue.claim(10).await.unwrap();
        queue.fail(id, "transient").await.unwrap();

        // Immediately after failing, the backoff window hasn't elapsed.
        assert!(queue.claim(10).await.unwrap().is_empty());

        tokio::time::sleep(std::time::Duration::from_millis(120)).await;
        let reclaimed = queue.claim(10).await.unwrap();
        assert_eq!(reclaimed.len(), 1);
        assert_eq!(reclaimed[0].id, id);
    }

    #[tokio::test]
    async fn complete_removes_claimed_job() {
        let queue = InMemoryJobQueue::new();
        let id = queue.enqueue(Job::ReindexAll).await.unwrap();
        queue.claim(10).await.unwrap();
        queue.complete(id).await.unwrap();

        let err = queue.complete(id).await.unwrap_err();
        assert!(matches!(err, JobQueueError::NotFound(_)));
    }
}
