//! Reconcile Service — the three reconciler behaviors
//!
//! The Counter and Index reconcilers run once at startup, before the HTTP
//! listener accepts connections. The Count reconciler runs on a configurable
//! interval for the life of the process. All three re-derive state from the
//! Durable Log Store, the only authoritative source of truth.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    error::ApplicationError,
    ports::{CounterStore, LogStore, MessageDocument, SearchIndex},
};

/// Re-derives Counter Store and Search Index state, and recomputes advisory
/// counts, from the Durable Log Store.
pub struct ReconcileService {
    log_store: Arc<dyn LogStore>,
    counters: Arc<dyn CounterStore>,
    search: Arc<dyn SearchIndex>,
}

impl ReconcileService {
    #[must_use]
    pub fn new(
        log_store: Arc<dyn LogStore>,
        counters: Arc<dyn CounterStore>,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self {
            log_store,
            counters,
            search,
        }
    }

    /// Rebuild Counter Store entries for up to `sample_size` applications
    /// (and every chat under them) from the Durable Log Store's true
    /// maximum numbers. Run once at startup; healing the rest happens
    /// lazily as each parent is next written to. `CounterStore::set` never
    /// decreases a counter that has already advanced past the computed max,
    /// so a counter racing ahead of the (not yet persisted) Durable Log
    /// Store is a normal, safe state, not something this sweep corrects.
    pub async fn reconcile_counters(&self, sample_size: usize) -> Result<usize, ApplicationError> {
        let mut app_ids = self.log_store.list_application_ids().await?;
        app_ids.truncate(sample_size);
        let sampled = app_ids.len();

        for application_id in app_ids {
            let max_chat = self.log_store.max_chat_number(application_id).await?;
            self.counters
                .set(&application_id.chat_counter_key(), max_chat)
                .await?;

            for chat_id in self.log_store.list_chat_ids(application_id).await? {
                let max_message = self.log_store.max_message_number(chat_id).await?;
                self.counters
                    .set(&chat_id.message_counter_key(), max_message)
                    .await?;
            }
        }

        info!(sampled, "counter reconciliation complete");
        Ok(sampled)
    }

    /// Compare the Search Index's document count against the Durable Log
    /// Store's true message count; if they diverge, rebuild the index from
    /// scratch. Run once at startup.
    pub async fn reconcile_index(&self) -> Result<bool, ApplicationError> {
        let authoritative = self.log_store.total_message_count().await?;
        let indexed = self.search.document_count().await?;

        if authoritative == indexed {
            info!(authoritative, "search index already consistent");
            return Ok(false);
        }

        warn!(
            authoritative,
            indexed, "search index drift detected, rebuilding"
        );

        let mut cursor = None;
        let mut first_batch = true;
        loop {
            let batch = self
                .log_store
                .list_messages_for_reindex(cursor, 500)
                .await?;
            if batch.is_empty() {
                break;
            }
            cursor = batch.last().map(|m| (m.created_at, m.id));

            let docs: Vec<MessageDocument> = batch
                .into_iter()
                .map(|m| MessageDocument {
                    message_id: m.id,
                    chat_id: m.chat_id,
                    body: m.body,
                    created_at: m.created_at,
                })
                .collect();

            self.search.bulk_import(docs, first_batch).await?;
            first_batch = false;
        }

        info!("search index rebuilt");
        Ok(true)
    }

    /// Recompute every application's `chats_count` and every chat's
    /// `messages_count` under a row lock. Run on `COUNT_RECONCILE_INTERVAL_SECS`.
    pub async fn reconcile_counts(&self) -> Result<(usize, usize), ApplicationError> {
        let app_ids = self.log_store.list_application_ids().await?;
        let mut apps_updated = 0;
        let mut chats_updated = 0;

        for application_id in &app_ids {
            self.log_store
                .recompute_and_store_chats_count(*application_id)
                .await?;
            apps_updated += 1;

            for chat_id in self.log_store.list_chat_ids(*application_id).await? {
                self.log_store
                    .recompute_and_store_messages_count(chat_id)
                    .await?;
                chats_updated += 1;
            }
        }

        info!(apps_updated, chats_updated, "count reconciliation complete");
        Ok((apps_updated, chats_updated))
    }
}

#[cfg(test)]
mod tests {
    use domain::value_objects::AppId;

    use super::*;
    use crate::ports::{MockCounterStore, MockLogStore, MockSearchIndex};

    #[tokio::test]
    async fn reconcile_index_skips_rebuild_when_counts_match() {
        let mut log_store = MockLogStore::new();
        log_store.expect_total_message_count().returning(|| Ok(10));

        let mut search = MockSearchIndex::new();
        search.expect_document_count().returning(|| Ok(10));

        let counters = MockCounterStore::new();

        let service = ReconcileService::new(Arc::new(log_store), Arc::new(counters), Arc::new(search));
        let rebuilt = service.reconcile_index().await.unwrap();
        assert!(!rebuilt);
    }

    #[tokio::test]
    async fn reconcile_index_rebuilds_on_drift() {
        let mut log_store = MockLogStore::new();
        log_store.expect_total_message_count().returning(|| Ok(10));
        log_store
            .expect_list_messages_for_reindex()
            .returning(|_, _| Ok(vec![]));

        let mut search = MockSearchIndex::new();
        search.expect_document_count().returning(|| Ok(3));

        let counters = MockCounterStore::new();

        let service = ReconcileService::new(Arc::new(log_store), Arc::new(counters), Arc::new(search));
        let rebuilt = service.reconcile_index().await.unwrap();
        assert!(rebuilt);
    }

    #[tokio::test]
    async fn reconcile_counters_respects_sample_size() {
        let mut log_store = MockLogStore::new();
        log_store.expect_list_application_ids().returning(|| {
            Ok((0..10).map(|_| AppId::new()).collect())
        });
        log_store.expect_max_chat_number().returning(|_| Ok(5));
        log_store.expect_list_chat_ids().returning(|_| Ok(vec![]));

        let mut counters = MockCounterStore::new();
        counters.expect_set().returning(|_, _| Ok(()));

        let search = MockSearchIndex::new();

        let service = ReconcileService::new(Arc::new(log_store), Arc::new(counters), Arc::new(search));
        let sampled = service.reconcile_counters(3).await.unwrap();
        assert_eq!(sampled, 3);
    }
}
