//! Job envelope carried on the Job Queue.
//!
//! Jobs are persisted as `{class, id, queue, args, created_at}` rows so that a
//! second, differently-implemented ingest process can enqueue into the same
//! queue without depending on these Rust types.

use chrono::{DateTime, Utc};
use domain::value_objects::{AppId, ChatId, MessageId, Number};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The seven job classes the queue carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class", content = "args", rename_all = "snake_case")]
pub enum Job {
    /// Persist a chat already allocated a `number` by the Counter Store.
    PersistChat {
        chat_id: ChatId,
        application_id: AppId,
        number: Number,
    },
    /// Persist a message already allocated a `number` by the Counter Store.
    PersistMessage {
        message_id: MessageId,
        chat_id: ChatId,
        number: Number,
        body: String,
        created_at: DateTime<Utc>,
    },
    /// Recompute `applications.chats_count` under a row lock.
    RecomputeAppCount { application_id: AppId },
    /// Recompute `chats.messages_count` under a row lock.
    RecomputeChatCount { chat_id: ChatId },
    /// Index a single message in the Search Index.
    IndexMessage {
        message_id: MessageId,
        chat_id: ChatId,
        body: String,
        created_at: DateTime<Utc>,
    },
    /// Rebuild the entire Search Index from the Durable Log Store.
    ReindexAll,
    /// Rebuild every Counter Store entry from the Durable Log Store.
    RebuildCounters,
}

impl Job {
    /// A short, stable name for logging and the `jobs.class` column.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::PersistChat { .. } => "persist_chat",
            Self::PersistMessage { .. } => "persist_message",
            Self::RecomputeAppCount { .. } => "recompute_app_count",
            Self::RecomputeChatCount { .. } => "recompute_chat_count",
            Self::IndexMessage { .. } => "index_message",
            Self::ReindexAll => "reindex_all",
            Self::RebuildCounters => "rebuild_counters",
        }
    }
}

/// A queued job record as it is stored and dequeued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub queue: String,
    pub job: Job,
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
}

impl JobRecord {
    /// Wrap a job for the default queue, with zero prior attempts.
    #[must_use]
    pub fn new(job: Job) -> Self {
        Self {
            id: Uuid::now_v7(),
            queue: "default".to_string(),
            job,
            attempts: 0,
            created_at: Utc::now(),
        }
    }
}
