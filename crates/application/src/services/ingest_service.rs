//! Ingest Service — the eleven public ingest/query operations
//!
//! Create operations follow the spec's five-step hot path: resolve the
//! parent, validate input, allocate a number from the Counter Store,
//! enqueue a persistence job, and reply — without waiting for the worker
//! to durably persist the row. Reads go straight to the Durable Log Store.

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use domain::{Application, Chat, Message};
use domain::value_objects::{AppId, ChatId, Number, Token};
use tracing::{info, instrument};

use crate::{
    error::ApplicationError,
    job::Job,
    ports::{CounterStore, JobQueue, LogStore, SearchIndex},
};

/// Orchestrates the ingest front-end's eleven public operations.
pub struct IngestService {
    counters: Arc<dyn CounterStore>,
    log_store: Arc<dyn LogStore>,
    queue: Arc<dyn JobQueue>,
    search: Arc<dyn SearchIndex>,
}

impl std::fmt::Debug for IngestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestService").finish_non_exhaustive()
    }
}

impl IngestService {
    #[must_use]
    pub fn new(
        counters: Arc<dyn CounterStore>,
        log_store: Arc<dyn LogStore>,
        queue: Arc<dyn JobQueue>,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self {
            counters,
            log_store,
            queue,
            search,
        }
    }

    /// Create a new application. Applications are persisted synchronously
    /// (they are the entry point for token resolution and carry no
    /// per-parent number allocation step), matching the spec's description
    /// of applications as the root tenant record.
    #[instrument(skip(self, name))]
    pub async fn create_application(&self, name: String) -> Result<Application, ApplicationError> {
        let app = Application::create(name)?;
        self.log_store.create_application(&app).await?;
        info!(token = %app.token, "application created");
        Ok(app)
    }

    pub async fn list_applications(&self) -> Result<Vec<Application>, ApplicationError> {
        Ok(self.log_store.list_applications().await?)
    }

    pub async fn get_application(&self, token: &Token) -> Result<Application, ApplicationError> {
        self.resolve_application(token).await
    }

    #[instrument(skip(self, name))]
    pub async fn update_application(
        &self,
        token: &Token,
        name: String,
    ) -> Result<Application, ApplicationError> {
        let mut app = self.resolve_application(token).await?;
        app.rename(name)?;
        self.log_store
            .update_application_name(app.id, &app.name)
            .await?;
        Ok(app)
    }

    /// Allocate a chat number and enqueue its persistence, without blocking
    /// on the Durable Log Store write.
    #[instrument(skip(self))]
    pub async fn create_chat(&self, token: &Token) -> Result<Chat, ApplicationError> {
        let app = self.resolve_application(token).await?;

        let number = self.counters.next(&app.id.chat_counter_key()).await?;
        let chat = Chat::new(app.id, Number::new(number));

        self.queue
            .enqueue(Job::PersistChat {
                chat_id: chat.id,
                application_id: app.id,
                number: chat.number,
            })
            .await?;

        info!(token = %token, number = number, "chat allocated");
        Ok(chat)
    }

    pub async fn list_chats(&self, token: &Token) -> Result<Vec<Chat>, ApplicationError> {
        let app = self.resolve_application(token).await?;
        let mut chats = self.log_store.list_chats(app.id).await?;
        chats.sort_by_key(|c| c.number);
        Ok(chats)
    }

    pub async fn get_chat(&self, token: &Token, number: Number) -> Result<Chat, ApplicationError> {
        let app = self.resolve_application(token).await?;
        self.resolve_chat(app.id, number).await
    }

    /// Allocate a message number and enqueue its persistence and indexing.
    #[instrument(skip(self, body))]
    pub async fn create_message(
        &self,
        token: &Token,
        chat_number: Number,
        body: String,
    ) -> Result<Message, ApplicationError> {
        let app = self.resolve_application(token).await?;
        let chat = self.resolve_chat(app.id, chat_number).await?;

        let number = self.counters.next(&chat.id.message_counter_key()).await?;
        let created_at = Utc::now();
        let message = Message::create(chat.id, Number::new(number), body, created_at)?;

        self.queue
            .enqueue(Job::PersistMessage {
                message_id: message.id,
                chat_id: chat.id,
                number: message.number,
                body: message.body.clone(),
                created_at: message.created_at,
            })
            .await?;

        info!(token = %token, chat_number = %chat_number, number = number, "message allocated");
        Ok(message)
    }

    pub async fn list_messages(
        &self,
        token: &Token,
        chat_number: Number,
    ) -> Result<Vec<Message>, ApplicationError> {
        let app = self.resolve_application(token).await?;
        let chat = self.resolve_chat(app.id, chat_number).await?;
        let mut messages = self.log_store.list_messages(chat.id).await?;
        messages.sort_by_key(|m| m.number);
        Ok(messages)
    }

    pub async fn get_message(
        &self,
        token: &Token,
        chat_number: Number,
        number: Number,
    ) -> Result<Message, ApplicationError> {
        let app = self.resolve_application(token).await?;
        let chat = self.resolve_chat(app.id, chat_number).await?;
        self.log_store
            .find_message_by_number(chat.id, number)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("message {number}")))
    }

    /// Case-insensitive substring search over a single chat's message bodies.
    #[instrument(skip(self, query))]
    pub async fn search_messages(
        &self,
        token: &Token,
        chat_number: Number,
        query: &str,
    ) -> Result<Vec<Message>, ApplicationError> {
        if query.trim().is_empty() {
            return Err(ApplicationError::InvalidQuery(
                "query must not be blank".to_string(),
            ));
        }

        let app = self.resolve_application(token).await?;
        let chat = self.resolve_chat(app.id, chat_number).await?;

        let matches = self.search.search(chat.id, query).await?;
        let wanted: HashSet<_> = matches.into_iter().collect();

        let mut messages = self.log_store.list_messages(chat.id).await?;
        messages.retain(|m| wanted.contains(&m.id));
        messages.sort_by_key(|m| m.number);
        Ok(messages)
    }

    async fn resolve_application(&self, token: &Token) -> Result<Application, ApplicationError> {
        self.log_store
            .find_application_by_token(token)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("application {token}")))
    }

    async fn resolve_chat(
        &self,
        application_id: AppId,
        number: Number,
    ) -> Result<Chat, ApplicationError> {
        self.log_store
            .find_chat_by_number(application_id, number)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("chat {number}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockCounterStore, MockJobQueue, MockLogStore, MockSearchIndex};

    fn app_fixture() -> Application {
        Application::create("Acme").unwrap()
    }

    #[tokio::test]
    async fn create_chat_allocates_and_enqueues_without_touching_log_store() {
        let app = app_fixture();
        let token = app.token.clone();

        let mut log_store = MockLogStore::new();
        log_store
            .expect_find_application_by_token()
            .returning(move |_| Ok(Some(app.clone())));
        log_store.expect_create_chat().times(0);

        let mut counters = MockCounterStore::new();
        counters.expect_next().returning(|_| Ok(1));

        let mut queue = MockJobQueue::new();
        queue
            .expect_enqueue()
            .withf(|job| matches!(job, Job::PersistChat { .. }))
            .returning(|_| Ok(uuid::Uuid::now_v7()));

        let search = MockSearchIndex::new();

        let service = IngestService::new(
            Arc::new(counters),
            Arc::new(log_store),
            Arc::new(queue),
            Arc::new(search),
        );

        let chat = service.create_chat(&token).await.unwrap();
        assert_eq!(chat.number.get(), 1);
        assert_eq!(chat.messages_count, 0);
    }

    #[tokio::test]
    async fn create_chat_fails_for_unknown_token() {
        let mut log_store = MockLogStore::new();
        log_store
            .expect_find_application_by_token()
            .returning(|_| Ok(None));

        let counters = MockCounterStore::new();
        let queue = MockJobQueue::new();
        let search = MockSearchIndex::new();

        let service = IngestService::new(
            Arc::new(counters),
            Arc::new(log_store),
            Arc::new(queue),
            Arc::new(search),
        );

        let token = Token::from_string("nonexistent");
        let result = service.create_chat(&token).await;
        assert!(matches!(result, Err(ApplicationError::NotFound(_))));
    }

    #[tokio::test]
    async fn search_messages_rejects_blank_query() {
        let log_store = MockLogStore::new();
        let counters = MockCounterStore::new();
        let queue = MockJobQueue::new();
        let search = MockSearchIndex::new();

        let service = IngestService::new(
            Arc::new(counters),
            Arc::new(log_store),
            Arc::new(queue),
            Arc::new(search),
        );

        let token = Token::from_string("t");
        let result = service.search_messages(&token, Number::new(1), "   ").await;
        assert!(matches!(result, Err(ApplicationError::InvalidQuery(_))));
    }

    #[tokio::test]
    async fn update_application_renames_and_persists() {
        let app = app_fixture();
        let token = app.token.clone();

        let mut log_store = MockLogStore::new();
        log_store
            .expect_find_application_by_token()
            .returning(move |_| Ok(Some(app.clone())));
        log_store
            .expect_update_application_name()
            .returning(|_, _| Ok(()));

        let counters = MockCounterStore::new();
        let queue = MockJobQueue::new();
        let search = MockSearchIndex::new();

        let service = IngestService::new(
            Arc::new(counters),
            Arc::new(log_store),
            Arc::new(queue),
            Arc::new(search),
        );

        let updated = service
            .update_application(&token, "Acme Corp".to_string())
            .await
            .unwrap();
        assert_eq!(updated.name, "Acme Corp");
    }
}
