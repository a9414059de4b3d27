//! Meilisearch-backed Search Index

use async_trait::async_trait;
use domain::value_objects::{ChatId, MessageId};
use meilisearch_sdk::client::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use application::ports::{MessageDocument, SearchIndex, SearchIndexError};

const INDEX_NAME: &str = "messages";

/// A message document as stored in Meilisearch, keyed by `message_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedMessage {
    message_id: String,
    chat_id: String,
    body: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MessageDocument> for IndexedMessage {
    fn from(doc: MessageDocument) -> Self {
        Self {
            message_id: doc.message_id.as_uuid().to_string(),
            chat_id: doc.chat_id.as_uuid().to_string(),
            body: doc.body,
            created_at: doc.created_at,
        }
    }
}

/// Search Index adapter backed by Meilisearch, addressed by `SEARCH_URL`.
#[derive(Debug, Clone)]
pub struct MeilisearchIndex {
    client: Client,
}

impl MeilisearchIndex {
    /// Connect to a Meilisearch instance at `url`, authenticating with
    /// `api_key` if set.
    pub fn new(url: &str, api_key: Option<&str>) -> Result<Self, SearchIndexError> {
        let client = Client::new(url, api_key)
            .map_err(|e| SearchIndexError::Unreachable(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchIndex for MeilisearchIndex {
    #[instrument(skip(self, doc))]
    async fn index(&self, doc: MessageDocument) -> Result<(), SearchIndexError> {
        let index = self.client.index(INDEX_NAME);
        index
            .add_or_update(&[IndexedMessage::from(doc)], Some("message_id"))
            .await
            .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, message_id: MessageId) -> Result<(), SearchIndexError> {
        let index = self.client.index(INDEX_NAME);
        index
            .delete_document(message_id.as_uuid().to_string())
            .await
            .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self, docs))]
    async fn bulk_import(
        &self,
        docs: Vec<MessageDocument>,
        force: bool,
    ) -> Result<(), SearchIndexError> {
        let index = self.client.index(INDEX_NAME);

        if force {
            index
                .delete_all_documents()
                .await
                .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;
        }

        let documents: Vec<IndexedMessage> = docs.into_iter().map(Into::into).collect();
        index
            .add_or_update(&documents, Some("message_id"))
            .await
            .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;
        Ok(())
    }

    async fn search(
        &self,
        chat_id: ChatId,
        query: &str,
    ) -> Result<Vec<MessageId>, SearchIndexError> {
        let index = self.client.index(INDEX_NAME);
        let filter = format!("chat_id = \"{}\"", chat_id.as_uuid());

        let results = index
            .search()
            .with_query(query)
            .with_filter(&filter)
            .execute::<IndexedMessage>()
            .await
            .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;

        results
            .hits
            .into_iter()
            .map(|hit| {
                hit.result
                    .message_id
                    .parse::<uuid::Uuid>()
                    .map(MessageId::from_uuid)
                    .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))
            })
            .collect()
    }

    async fn document_count(&self) -> Result<u64, SearchIndexError> {
        let index = self.client.index(INDEX_NAME);
        let stats = index
            .get_stats()
            .await
            .map_err(|e| SearchIndexError::RequestFailed(e.to_string()))?;
        Ok(stats.number_of_documents as u64)
    }
}
