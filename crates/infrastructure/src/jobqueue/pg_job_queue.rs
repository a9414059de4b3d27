//! Postgres-backed Job Queue
//!
//! Modeled on the exponential-backoff, dead-letter retry queue pattern:
//! claims are taken with `SELECT ... FOR UPDATE SKIP LOCKED` so a
//! fixed-size worker pool can poll the same table without double-claiming a
//! row, `fail` reschedules with backoff up to [`RetryConfig::max_retries`]
//! before moving the job to `jobs_dead_letter`. A failed job's `next_retry_at`
//! is pushed out by [`RetryConfig::delay_for_attempt`] and `claim` only
//! considers rows whose `next_retry_at` has passed, so a transient failure
//! doesn't make the job immediately reclaimable.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use application::job::{Job, JobRecord};
use application::ports::{JobQueue, JobQueueError};

use crate::retry::RetryConfig;

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    queue: String,
    class: String,
    payload: serde_json::Value,
    attempts: i32,
    created_at: chrono::DateTime<Utc>,
}

const JOB_COLUMNS: &str = "id, queue, class, payload, attempts, created_at";

impl TryFrom<JobRow> for JobRecord {
    type Error = JobQueueError;

    #[allow(clippy::cast_sign_loss)]
    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let job: Job = serde_json::from_value(serde_json::json!({
            "class": row.class,
            "args": row.payload,
        }))
        .map_err(|e| JobQueueError::Storage(e.to_string()))?;

        Ok(Self {
            id: row.id,
            queue: row.queue,
            job,
            attempts: row.attempts as u32,
            created_at: row.created_at,
        })
    }
}

/// Job Queue adapter backed by a Postgres `jobs` table.
#[derive(Clone)]
pub struct PgJobQueue {
    pool: PgPool,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for PgJobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgJobQueue").finish_non_exhaustive()
    }
}

impl PgJobQueue {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            retry_config: RetryConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(pool: PgPool, retry_config: RetryConfig) -> Self {
        Self { pool, retry_config }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    #[instrument(skip(self, job), fields(class = job.class()))]
    async fn enqueue(&self, job: Job) -> Result<Uuid, JobQueueError> {
        let record = JobRecord::new(job);
        let value = serde_json::to_value(&record.job)
            .map_err(|e| JobQueueError::Storage(e.to_string()))?;
        let class = value
            .get("class")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let args = value.get("args").cloned().unwrap_or(serde_json::Value::Null);

        sqlx::query(
            "INSERT INTO jobs (id, queue, class, payload, attempts, next_retry_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, now(), $6)",
        )
        .bind(record.id)
        .bind(&record.queue)
        .bind(&class)
        .bind(&args)
        .bind(0_i32)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| JobQueueError::Storage(e.to_string()))?;

        Ok(record.id)
    }

    #[instrument(skip(self))]
    async fn claim(&self, limit: usize) -> Result<Vec<JobRecord>, JobQueueError> {
        #[allow(clippy::cast_possible_wrap)]
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE claimed_at IS NULL AND next_retry_at <= now() \
             ORDER BY created_at \
             LIMIT $1 \
             FOR UPDATE SKIP LOCKED",
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| JobQueueError::Storage(e.to_string()))?;

        if !rows.is_empty() {
            let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
            sqlx::query("UPDATE jobs SET claimed_at = now() WHERE id = ANY($1)")
                .bind(&ids)
                .execute(&self.pool)
                .await
                .map_err(|e| JobQueueError::Storage(e.to_string()))?;
        }

        rows.into_iter().map(JobRecord::try_from).collect()
    }

    async fn complete(&self, id: Uuid) -> Result<(), JobQueueError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| JobQueueError::Storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(JobQueueError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(error = %error))]
    async fn fail(&self, id: Uuid, error: &str) -> Result<bool, JobQueueError> {
        let row: JobRow = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| JobQueueError::Storage(e.to_string()))?
            .ok_or(JobQueueError::NotFound(id))?;

        let new_attempts = row.attempts + 1;

        if new_attempts as u32 >= self.retry_config.max_retries {
            sqlx::query(
                "INSERT INTO jobs_dead_letter (id, queue, class, payload, attempts, last_error, created_at, failed_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, now())",
            )
            .bind(row.id)
            .bind(&row.queue)
            .bind(&row.class)
            .bind(&row.payload)
            .bind(new_attempts)
            .bind(error)
            .bind(row.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| JobQueueError::Storage(e.to_string()))?;

            sqlx::query("DELETE FROM jobs WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| JobQueueError::Storage(e.to_string()))?;

            warn!(%id, attempts = new_attempts, "job exhausted retries, moved to dead letter");
            return Ok(false);
        }

        #[allow(clippy::cast_sign_loss)]
        let delay = self.retry_config.delay_for_attempt(new_attempts as u32);
        let next_retry_at = Utc::now()
            + chrono::Duration::from_std(delay).unwrap_or_else(|_| chrono::Duration::zero());

        sqlx::query(
            "UPDATE jobs SET attempts = $1, claimed_at = NULL, next_retry_at = $2 WHERE id = $3",
        )
        .bind(new_attempts)
        .bind(next_retry_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| JobQueueError::Storage(e.to_string()))?;

        info!(%id, attempts = new_attempts, delay_ms = %delay.as_millis(), "job rescheduled");
        Ok(true)
    }
}
