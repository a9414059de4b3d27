//! Search Index port — secondary index over message bodies

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::value_objects::{ChatId, MessageId};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Errors at the Search Index boundary.
#[derive(Debug, Error)]
pub enum SearchIndexError {
    #[error("search index unreachable: {0}")]
    Unreachable(String),

    #[error("search index request failed: {0}")]
    RequestFailed(String),
}

/// A single message as represented in the Search Index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDocument {
    pub message_id: MessageId,
    pub chat_id: ChatId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Secondary index over message bodies, supporting case-insensitive
/// substring search scoped to a single chat.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Index or re-index a single document.
    async fn index(&self, doc: MessageDocument) -> Result<(), SearchIndexError>;

    /// Remove a document from the index (messages are never deleted by the
    /// core today, but the port models it for completeness and for tests).
    async fn delete(&self, message_id: MessageId) -> Result<(), SearchIndexError>;

    /// Replace the index contents for a full rebuild. `force` clears any
    /// existing documents first; otherwise documents are merged/overwritten.
    async fn bulk_import(
        &self,
        docs: Vec<MessageDocument>,
        force: bool,
    ) -> Result<(), SearchIndexError>;

    /// Case-insensitive substring search scoped to `chat_id`, returning
    /// matching message ids.
    async fn search(
        &self,
        chat_id: ChatId,
        query: &str,
    ) -> Result<Vec<MessageId>, SearchIndexError>;

    /// Total indexed document count, used by the Index Reconciler's startup
    /// drift check against the Durable Log Store's true message count.
    async fn document_count(&self) -> Result<u64, SearchIndexError>;
}
