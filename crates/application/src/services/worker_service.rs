//! Worker Service — dispatches claimed jobs to the Durable Log Store and
//! Search Index, following the corpus's "insert then enqueue next job" shape.

use std::{sync::Arc, time::Duration};

use domain::{Chat, Message};
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApplicationError,
    job::{Job, JobRecord},
    ports::{CounterStore, JobQueue, LogStore, LogStoreError, MessageDocument, SearchIndex},
};

/// Backoff schedule for `IndexMessage`: retried in-process, then swallowed in
/// favor of the Index Reconciler's startup recovery sweep.
const INDEX_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Executes claimed jobs to completion, retrying transient failures and
/// dropping permanent conflicts without retry.
pub struct WorkerService {
    log_store: Arc<dyn LogStore>,
    queue: Arc<dyn JobQueue>,
    search: Arc<dyn SearchIndex>,
    counters: Arc<dyn CounterStore>,
}

impl WorkerService {
    #[must_use]
    pub fn new(
        log_store: Arc<dyn LogStore>,
        queue: Arc<dyn JobQueue>,
        search: Arc<dyn SearchIndex>,
        counters: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            log_store,
            queue,
            search,
            counters,
        }
    }

    /// Claim up to `batch_size` jobs and run each to completion.
    #[instrument(skip(self))]
    pub async fn run_once(&self, batch_size: usize) -> Result<usize, ApplicationError> {
        let jobs = self.queue.claim(batch_size).await?;
        let count = jobs.len();
        for record in jobs {
            self.process(record).await;
        }
        Ok(count)
    }

    async fn process(&self, record: JobRecord) {
        let id = record.id;
        let class = record.job.class();

        match self.dispatch(&record.job).await {
            Ok(()) => {
                if let Err(err) = self.queue.complete(id).await {
                    error!(%id, class, error = %err, "failed to mark job complete");
                }
            },
            Err(DispatchOutcome::Drop(reason)) => {
                warn!(%id, class, reason = %reason, "job dropped without retry");
                if let Err(err) = self.queue.complete(id).await {
                    error!(%id, class, error = %err, "failed to drop job");
                }
            },
            Err(DispatchOutcome::Retry(reason)) => {
                warn!(%id, class, reason = %reason, "job failed, scheduling retry");
                if let Err(err) = self.queue.fail(id, &reason).await {
                    error!(%id, class, error = %err, "failed to reschedule job");
                }
            },
        }
    }

    async fn dispatch(&self, job: &Job) -> Result<(), DispatchOutcome> {
        match job {
            Job::PersistChat {
                chat_id,
                application_id,
                number,
            } => {
                let chat = Chat {
                    id: *chat_id,
                    application_id: *application_id,
                    number: *number,
                    messages_count: 0,
                };
                self.persist_chat(chat).await
            },
            Job::PersistMessage {
                message_id,
                chat_id,
                number,
                body,
                created_at,
            } => {
                let message = Message {
                    id: *message_id,
                    chat_id: *chat_id,
                    number: *number,
                    body: body.clone(),
                    created_at: *created_at,
                };
                self.persist_message(message).await
            },
            Job::RecomputeAppCount { application_id } => self
                .log_store
                .recompute_and_store_chats_count(*application_id)
                .await
                .map(|_| ())
                .map_err(DispatchOutcome::from_log_store),
            Job::RecomputeChatCount { chat_id } => self
                .log_store
                .recompute_and_store_messages_count(*chat_id)
                .await
                .map(|_| ())
                .map_err(DispatchOutcome::from_log_store),
            Job::IndexMessage {
                message_id,
                chat_id,
                body,
                created_at,
            } => {
                self.index_with_backoff(*message_id, *chat_id, body.clone(), *created_at)
                    .await;
                Ok(())
            },
            Job::ReindexAll => self.reindex_all().await,
            Job::RebuildCounters => self.rebuild_counters().await,
        }
    }

    async fn persist_chat(&self, chat: Chat) -> Result<(), DispatchOutcome> {
        let application_id = chat.application_id;
        match self.log_store.create_chat(&chat).await {
            Ok(()) => {
                if let Err(err) = self
                    .queue
                    .enqueue(Job::RecomputeAppCount { application_id })
                    .await
                {
                    error!(error = %err, "failed to enqueue recount job");
                }
                info!(chat_id = %chat.id, "chat persisted");
                Ok(())
            },
            Err(err) => Err(DispatchOutcome::from_log_store(err)),
        }
    }

    async fn persist_message(&self, message: Message) -> Result<(), DispatchOutcome> {
        let chat_id = message.chat_id;
        match self.log_store.create_message(&message).await {
            Ok(()) => {
                if let Err(err) = self
                    .queue
                    .enqueue(Job::RecomputeChatCount { chat_id })
                    .await
                {
                    error!(error = %err, "failed to enqueue recount job");
                }
                if let Err(err) = self
                    .queue
                    .enqueue(Job::IndexMessage {
                        message_id: message.id,
                        chat_id,
                        body: message.body.clone(),
                        created_at: message.created_at,
                    })
                    .await
                {
                    error!(error = %err, "failed to enqueue index job");
                }
                info!(message_id = %message.id, "message persisted");
                Ok(())
            },
            Err(err) => Err(DispatchOutcome::from_log_store(err)),
        }
    }

    /// Retry indexing with a short fixed backoff, then swallow the failure:
    /// the Index Reconciler's startup sweep is the recovery path.
    async fn index_with_backoff(
        &self,
        message_id: domain::value_objects::MessageId,
        chat_id: domain::value_objects::ChatId,
        body: String,
        created_at: chrono::DateTime<chrono::Utc>,
    ) {
        let doc = MessageDocument {
            message_id,
            chat_id,
            body,
            created_at,
        };

        let mut last_err = None;
        if self.search.index(doc.clone()).await.is_ok() {
            return;
        }
        for delay in INDEX_RETRY_DELAYS {
            tokio::time::sleep(delay).await;
            match self.search.index(doc.clone()).await {
                Ok(()) => return,
                Err(err) => last_err = Some(err),
            }
        }
        if let Some(err) = last_err {
            warn!(%message_id, error = %err, "index retries exhausted, deferring to reconciler");
        }
    }

    async fn reindex_all(&self) -> Result<(), DispatchOutcome> {
        let mut cursor = None;
        loop {
            let batch = self
                .log_store
                .list_messages_for_reindex(cursor, 500)
                .await
                .map_err(DispatchOutcome::from_log_store)?;
            if batch.is_empty() {
                break;
            }
            cursor = batch
                .last()
                .map(|m| (m.created_at, m.id));

            let docs = batch
                .into_iter()
                .map(|m| MessageDocument {
                    message_id: m.id,
                    chat_id: m.chat_id,
                    body: m.body,
                    created_at: m.created_at,
                })
                .collect();

            self.search
                .bulk_import(docs, false)
                .await
                .map_err(|err| DispatchOutcome::Retry(err.to_string()))?;
        }
        Ok(())
    }

    async fn rebuild_counters(&self) -> Result<(), DispatchOutcome> {
        let app_ids = self
            .log_store
            .list_application_ids()
            .await
            .map_err(DispatchOutcome::from_log_store)?;

        for application_id in app_ids {
            let max_chat = self
                .log_store
                .max_chat_number(application_id)
                .await
                .map_err(DispatchOutcome::from_log_store)?;
            self.counters
                .set(&application_id.chat_counter_key(), max_chat)
                .await
                .map_err(|err| DispatchOutcome::Retry(err.to_string()))?;

            let chat_ids = self
                .log_store
                .list_chat_ids(application_id)
                .await
                .map_err(DispatchOutcome::from_log_store)?;
            for chat_id in chat_ids {
                let max_message = self
                    .log_store
                    .max_message_number(chat_id)
                    .await
                    .map_err(DispatchOutcome::from_log_store)?;
                self.counters
                    .set(&chat_id.message_counter_key(), max_message)
                    .await
                    .map_err(|err| DispatchOutcome::Retry(err.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Internal classification of a failed dispatch: whether the queue should
/// drop the job (permanent conflict) or retry it (transient failure).
enum DispatchOutcome {
    Drop(String),
    Retry(String),
}

impl DispatchOutcome {
    fn from_log_store(err: LogStoreError) -> Self {
        match err {
            LogStoreError::Conflict(msg) => Self::Drop(msg),
            other => Self::Retry(other.to_string()),
        }
    }
}
