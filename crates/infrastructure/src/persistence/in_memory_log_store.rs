//! In-memory Durable Log Store adapter
//!
//! Used as the local development fallback when `DB_DSN` is unset, and as
//! the backing store for `presentation_http`'s end-to-end integration
//! tests, where a real Postgres instance would be both slow and
//! unnecessary. Enforces the same I1/I2 uniqueness invariants as
//! [`super::log_store::PgLogStore`], just in a `Mutex`-guarded `Vec`
//! instead of a unique index.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::value_objects::{AppId, ChatId, MessageId, Number, Token};
use domain::{Application, Chat, Message};

use application::ports::{LogStore, LogStoreError};

#[derive(Debug, Default)]
struct State {
    applications: Vec<Application>,
    chats: Vec<Chat>,
    messages: Vec<Message>,
}

/// In-process, `Mutex`-guarded implementation of [`LogStore`].
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    state: Mutex<State>,
}

impl InMemoryLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn create_application(&self, application: &Application) -> Result<(), LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.applications.iter().any(|a| a.token == application.token) {
            return Err(LogStoreError::Conflict(format!(
                "token {} already exists",
                application.token
            )));
        }
        state.applications.push(application.clone());
        Ok(())
    }

    async fn update_application_name(&self, id: AppId, name: &str) -> Result<(), LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let app = state
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| LogStoreError::NotFound(format!("application {id}")))?;
        app.name = name.to_string();
        Ok(())
    }

    async fn find_application_by_token(
        &self,
        token: &Token,
    ) -> Result<Option<Application>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .applications
            .iter()
            .find(|a| &a.token == token)
            .cloned())
    }

    async fn list_applications(&self) -> Result<Vec<Application>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.applications.clone())
    }

    async fn create_chat(&self, chat: &Chat) -> Result<(), LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state
            .chats
            .iter()
            .any(|c| c.application_id == chat.application_id && c.number == chat.number)
        {
            return Err(LogStoreError::Conflict(format!(
                "chat number {} already exists under application {}",
                chat.number, chat.application_id
            )));
        }
        state.chats.push(chat.clone());
        Ok(())
    }

    async fn find_chat_by_number(
        &self,
        application_id: AppId,
        number: Number,
    ) -> Result<Option<Chat>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .chats
            .iter()
            .find(|c| c.application_id == application_id && c.number == number)
            .cloned())
    }

    async fn list_chats(&self, application_id: AppId) -> Result<Vec<Chat>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .chats
            .iter()
            .filter(|c| c.application_id == application_id)
            .cloned()
            .collect())
    }

    async fn create_message(&self, message: &Message) -> Result<(), LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state
            .messages
            .iter()
            .any(|m| m.chat_id == message.chat_id && m.number == message.number)
        {
            return Err(LogStoreError::Conflict(format!(
                "message number {} already exists under chat {}",
                message.number, message.chat_id
            )));
        }
        state.messages.push(message.clone());
        Ok(())
    }

    async fn find_message_by_number(
        &self,
        chat_id: ChatId,
        number: Number,
    ) -> Result<Option<Message>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .messages
            .iter()
            .find(|m| m.chat_id == chat_id && m.number == number)
            .cloned())
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn recompute_and_store_chats_count(
        &self,
        application_id: AppId,
    ) -> Result<i64, LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.applications.iter().any(|a| a.id == application_id) {
            return Err(LogStoreError::NotFound(format!("application {application_id}")));
        }
        let count = state
            .chats
            .iter()
            .filter(|c| c.application_id == application_id)
            .count() as i64;
        if let Some(app) = state.applications.iter_mut().find(|a| a.id == application_id) {
            app.chats_count = count;
        }
        Ok(count)
    }

    async fn recompute_and_store_messages_count(&self, chat_id: ChatId) -> Result<i64, LogStoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.chats.iter().any(|c| c.id == chat_id) {
            return Err(LogStoreError::NotFound(format!("chat {chat_id}")));
        }
        let count = state.messages.iter().filter(|m| m.chat_id == chat_id).count() as i64;
        if let Some(chat) = state.chats.iter_mut().find(|c| c.id == chat_id) {
            chat.messages_count = count;
        }
        Ok(count)
    }

    async fn max_chat_number(&self, application_id: AppId) -> Result<u64, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .chats
            .iter()
            .filter(|c| c.application_id == application_id)
            .map(|c| c.number.get())
            .max()
            .unwrap_or(0))
    }

    async fn max_message_number(&self, chat_id: ChatId) -> Result<u64, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .map(|m| m.number.get())
            .max()
            .unwrap_or(0))
    }

    async fn total_message_count(&self) -> Result<u64, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.messages.len() as u64)
    }

    async fn list_messages_for_reindex(
        &self,
        after: Option<(DateTime<Utc>, MessageId)>,
        limit: usize,
    ) -> Result<Vec<Message>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut messages = state.messages.clone();
        messages.sort_by_key(|m| (m.created_at, m.id.as_uuid()));

        let start = match after {
            Some((created_at, id)) => messages
                .iter()
                .position(|m| (m.created_at, m.id.as_uuid()) > (created_at, id.as_uuid()))
                .unwrap_or(messages.len()),
            None => 0,
        };

        Ok(messages.into_iter().skip(start).take(limit).collect())
    }

    async fn list_application_ids(&self) -> Result<Vec<AppId>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.applications.iter().map(|a| a.id).collect())
    }

    async fn list_chat_ids(&self, application_id: AppId) -> Result<Vec<ChatId>, LogStoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .chats
            .iter()
            .filter(|c| c.application_id == application_id)
            .map(|c| c.id)
            .collect())
    }
}
