//! Postgres-backed Durable Log Store — the authoritative source of truth
//!
//! Schema lives under `migrations/` and is applied via `sqlx::migrate!` at
//! startup. Invariants I1 (`(application_id, number)` unique per chat) and
//! I2 (`(chat_id, number)` unique per message) are enforced by unique
//! indexes rather than application-level checks, so a race between two
//! concurrent allocations surfaces as [`LogStoreError::Conflict`] instead of
//! silently overwriting a row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::value_objects::{AppId, ChatId, MessageId, Number, Token};
use domain::{Application, Chat, Message};
use sqlx::PgPool;
use tracing::instrument;

use application::ports::{LogStore, LogStoreError};

use super::error::map_sqlx_error;

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: uuid::Uuid,
    token: String,
    name: String,
    chats_count: i64,
}

impl From<ApplicationRow> for Application {
    fn from(row: ApplicationRow) -> Self {
        Self {
            id: AppId::from_uuid(row.id),
            token: Token::from_string(row.token),
            name: row.name,
            chats_count: row.chats_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChatRow {
    id: uuid::Uuid,
    application_id: uuid::Uuid,
    number: i64,
    messages_count: i64,
}

impl From<ChatRow> for Chat {
    #[allow(clippy::cast_sign_loss)]
    fn from(row: ChatRow) -> Self {
        Self {
            id: ChatId::from_uuid(row.id),
            application_id: AppId::from_uuid(row.application_id),
            number: Number::new(row.number as u64),
            messages_count: row.messages_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: uuid::Uuid,
    chat_id: uuid::Uuid,
    number: i64,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    #[allow(clippy::cast_sign_loss)]
    fn from(row: MessageRow) -> Self {
        Self {
            id: MessageId::from_uuid(row.id),
            chat_id: ChatId::from_uuid(row.chat_id),
            number: Number::new(row.number as u64),
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Durable Log Store adapter backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run compiled-in migrations. Call once at startup.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    #[instrument(skip(self, application))]
    async fn create_application(&self, application: &Application) -> Result<(), LogStoreError> {
        sqlx::query(
            "INSERT INTO applications (id, token, name, chats_count) VALUES ($1, $2, $3, $4)",
        )
        .bind(application.id.as_uuid())
        .bind(application.token.as_str())
        .bind(&application.name)
        .bind(application.chats_count)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn update_application_name(&self, id: AppId, name: &str) -> Result<(), LogStoreError> {
        let result = sqlx::query("UPDATE applications SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(LogStoreError::NotFound(format!("application {id}")));
        }
        Ok(())
    }

    async fn find_application_by_token(
        &self,
        token: &Token,
    ) -> Result<Option<Application>, LogStoreError> {
        let row: Option<ApplicationRow> = sqlx::query_as(
            "SELECT id, token, name, chats_count FROM applications WHERE token = $1",
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_applications(&self) -> Result<Vec<Application>, LogStoreError> {
        let rows: Vec<ApplicationRow> =
            sqlx::query_as("SELECT id, token, name, chats_count FROM applications ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn create_chat(&self, chat: &Chat) -> Result<(), LogStoreError> {
        sqlx::query(
            "INSERT INTO chats (id, application_id, number, messages_count) VALUES ($1, $2, $3, $4)",
        )
        .bind(chat.id.as_uuid())
        .bind(chat.application_id.as_uuid())
        .bind(chat.number.get() as i64)
        .bind(chat.messages_count)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn find_chat_by_number(
        &self,
        application_id: AppId,
        number: Number,
    ) -> Result<Option<Chat>, LogStoreError> {
        let row: Option<ChatRow> = sqlx::query_as(
            "SELECT id, application_id, number, messages_count FROM chats \
             WHERE application_id = $1 AND number = $2",
        )
        .bind(application_id.as_uuid())
        .bind(number.get() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_chats(&self, application_id: AppId) -> Result<Vec<Chat>, LogStoreError> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            "SELECT id, application_id, number, messages_count FROM chats \
             WHERE application_id = $1 ORDER BY number",
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn create_message(&self, message: &Message) -> Result<(), LogStoreError> {
        sqlx::query(
            "INSERT INTO messages (id, chat_id, number, body, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id.as_uuid())
        .bind(message.chat_id.as_uuid())
        .bind(message.number.get() as i64)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn find_message_by_number(
        &self,
        chat_id: ChatId,
        number: Number,
    ) -> Result<Option<Message>, LogStoreError> {
        let row: Option<MessageRow> = sqlx::query_as(
            "SELECT id, chat_id, number, body, created_at FROM messages \
             WHERE chat_id = $1 AND number = $2",
        )
        .bind(chat_id.as_uuid())
        .bind(number.get() as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, LogStoreError> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, chat_id, number, body, created_at FROM messages \
             WHERE chat_id = $1 ORDER BY number",
        )
        .bind(chat_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recompute_and_store_chats_count(
        &self,
        application_id: AppId,
    ) -> Result<i64, LogStoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("SELECT id FROM applications WHERE id = $1 FOR UPDATE")
            .bind(application_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| LogStoreError::NotFound(format!("application {application_id}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats WHERE application_id = $1")
            .bind(application_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("UPDATE applications SET chats_count = $1 WHERE id = $2")
            .bind(count)
            .bind(application_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(count)
    }

    async fn recompute_and_store_messages_count(&self, chat_id: ChatId) -> Result<i64, LogStoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("SELECT id FROM chats WHERE id = $1 FOR UPDATE")
            .bind(chat_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or_else(|| LogStoreError::NotFound(format!("chat {chat_id}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE chat_id = $1")
            .bind(chat_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        sqlx::query("UPDATE chats SET messages_count = $1 WHERE id = $2")
            .bind(count)
            .bind(chat_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(count)
    }

    #[allow(clippy::cast_sign_loss)]
    async fn max_chat_number(&self, application_id: AppId) -> Result<u64, LogStoreError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(number) FROM chats WHERE application_id = $1")
                .bind(application_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(max.unwrap_or(0) as u64)
    }

    #[allow(clippy::cast_sign_loss)]
    async fn max_message_number(&self, chat_id: ChatId) -> Result<u64, LogStoreError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(number) FROM messages WHERE chat_id = $1")
                .bind(chat_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(max.unwrap_or(0) as u64)
    }

    #[allow(clippy::cast_sign_loss)]
    async fn total_message_count(&self) -> Result<u64, LogStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(count as u64)
    }

    #[allow(clippy::cast_possible_wrap)]
    async fn list_messages_for_reindex(
        &self,
        after: Option<(DateTime<Utc>, MessageId)>,
        limit: usize,
    ) -> Result<Vec<Message>, LogStoreError> {
        let rows: Vec<MessageRow> = if let Some((created_at, id)) = after {
            sqlx::query_as(
                "SELECT id, chat_id, number, body, created_at FROM messages \
                 WHERE (created_at, id) > ($1, $2) \
                 ORDER BY created_at, id LIMIT $3",
            )
            .bind(created_at)
            .bind(id.as_uuid())
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?
        } else {
            sqlx::query_as(
                "SELECT id, chat_id, number, body, created_at FROM messages \
                 ORDER BY created_at, id LIMIT $1",
            )
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_application_ids(&self) -> Result<Vec<AppId>, LogStoreError> {
        let ids: Vec<uuid::Uuid> = sqlx::query_scalar("SELECT id FROM applications ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(ids.into_iter().map(AppId::from_uuid).collect())
    }

    async fn list_chat_ids(&self, application_id: AppId) -> Result<Vec<ChatId>, LogStoreError> {
        let ids: Vec<uuid::Uuid> = sqlx::query_scalar(
            "SELECT id FROM chats WHERE application_id = $1 ORDER BY id",
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(ids.into_iter().map(ChatId::from_uuid).collect())
    }
}
