//! In-memory Search Index adapter, for local development and tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use domain::value_objects::{ChatId, MessageId};

use application::ports::{MessageDocument, SearchIndex, SearchIndexError};

/// In-process substring matcher implementing [`SearchIndex`].
#[derive(Debug, Default)]
pub struct InMemorySearchIndex {
    documents: Mutex<HashMap<MessageId, MessageDocument>>,
}

impl InMemorySearchIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn index(&self, doc: MessageDocument) -> Result<(), SearchIndexError> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents.insert(doc.message_id, doc);
        Ok(())
    }

    async fn delete(&self, message_id: MessageId) -> Result<(), SearchIndexError> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents.remove(&message_id);
        Ok(())
    }

    async fn bulk_import(
        &self,
        docs: Vec<MessageDocument>,
        force: bool,
    ) -> Result<(), SearchIndexError> {
        let mut documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        if force {
            documents.clear();
        }
        for doc in docs {
            documents.insert(doc.message_id, doc);
        }
        Ok(())
    }

    async fn search(
        &self,
        chat_id: ChatId,
        query: &str,
    ) -> Result<Vec<MessageId>, SearchIndexError> {
        let needle = query.to_lowercase();
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(documents
            .values()
            .filter(|doc| doc.chat_id == chat_id && doc.body.to_lowercase().contains(&needle))
            .map(|doc| doc.message_id)
            .collect())
    }

    async fn document_count(&self) -> Result<u64, SearchIndexError> {
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(documents.len() as u64)
    }
}
