//! Durable Log Store port — authoritative persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Application, Chat, Message};
use domain::value_objects::{AppId, ChatId, MessageId, Number, Token};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Errors distinguishable at the Durable Log Store boundary.
///
/// `Conflict` is surfaced separately from other failures so the worker can
/// apply the "log, drop, never retry with the same number" policy without
/// inspecting error message text.
#[derive(Debug, Error)]
pub enum LogStoreError {
    /// A `(parent, number)` or `token` uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transient failure (connection lost, pool exhausted, timeout).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Authoritative persistence for applications, chats, and messages.
///
/// Enforces invariants I1/I2 (no duplicate `(parent, number)`) via unique
/// indexes in the production adapter; see the physical index list in the
/// component design.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LogStore: Send + Sync {
    async fn create_application(&self, application: &Application) -> Result<(), LogStoreError>;

    async fn update_application_name(
        &self,
        id: AppId,
        name: &str,
    ) -> Result<(), LogStoreError>;

    async fn find_application_by_token(
        &self,
        token: &Token,
    ) -> Result<Option<Application>, LogStoreError>;

    async fn list_applications(&self) -> Result<Vec<Application>, LogStoreError>;

    async fn create_chat(&self, chat: &Chat) -> Result<(), LogStoreError>;

    async fn find_chat_by_number(
        &self,
        application_id: AppId,
        number: Number,
    ) -> Result<Option<Chat>, LogStoreError>;

    async fn list_chats(&self, application_id: AppId) -> Result<Vec<Chat>, LogStoreError>;

    async fn create_message(&self, message: &Message) -> Result<(), LogStoreError>;

    async fn find_message_by_number(
        &self,
        chat_id: ChatId,
        number: Number,
    ) -> Result<Option<Message>, LogStoreError>;

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, LogStoreError>;

    /// Recompute `chats_count` for `application_id` under a row lock and
    /// write it back, closing the read-then-write-back race. Returns the
    /// freshly written count.
    async fn recompute_and_store_chats_count(
        &self,
        application_id: AppId,
    ) -> Result<i64, LogStoreError>;

    /// Recompute `messages_count` for `chat_id` under a row lock and write
    /// it back. Returns the freshly written count.
    async fn recompute_and_store_messages_count(
        &self,
        chat_id: ChatId,
    ) -> Result<i64, LogStoreError>;

    /// The highest `number` assigned under `application_id`'s chats, or 0 if none.
    async fn max_chat_number(&self, application_id: AppId) -> Result<u64, LogStoreError>;

    /// The highest `number` assigned under `chat_id`'s messages, or 0 if none.
    async fn max_message_number(&self, chat_id: ChatId) -> Result<u64, LogStoreError>;

    /// Total message count across every tenant, for the Index Reconciler's
    /// startup drift check against [`crate::ports::SearchIndex::document_count`].
    async fn total_message_count(&self) -> Result<u64, LogStoreError>;

    /// Page through every message in `(created_at, id)` order for a full
    /// reindex. `after` is the cursor of the last message seen.
    async fn list_messages_for_reindex(
        &self,
        after: Option<(DateTime<Utc>, MessageId)>,
        limit: usize,
    ) -> Result<Vec<Message>, LogStoreError>;

    /// Every application id, for the Counter Reconciler's sampling sweep.
    async fn list_application_ids(&self) -> Result<Vec<AppId>, LogStoreError>;

    /// Every chat id under `application_id`, for the Counter Reconciler.
    async fn list_chat_ids(&self, application_id: AppId) -> Result<Vec<ChatId>, LogStoreError>;
}
