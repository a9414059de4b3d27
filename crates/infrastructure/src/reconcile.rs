//! Scheduled task factories wrapping `ReconcileService` for the `TaskScheduler`.
//!
//! The Counter and Index reconcilers are meant to run once at startup, before
//! the HTTP listener accepts connections, so they are exposed as plain async
//! functions rather than scheduled tasks. The Count reconciler runs on an
//! interval for the life of the process, so it is wrapped into a
//! `TaskScheduler`-compatible closure.

use std::sync::Arc;

use application::services::ReconcileService;
use tracing::{error, info};

/// Sample `sample_size` applications and rebuild their Counter Store entries
/// from the Durable Log Store. Call once before accepting connections.
pub async fn run_counter_reconciliation(service: &ReconcileService, sample_size: usize) {
    match service.reconcile_counters(sample_size).await {
        Ok(sampled) => info!(sampled, "startup counter reconciliation complete"),
        Err(error) => error!(%error, "startup counter reconciliation failed"),
    }
}

/// Compare the Search Index against the Durable Log Store and rebuild on
/// drift. Call once before accepting connections.
pub async fn run_index_reconciliation(service: &ReconcileService) {
    match service.reconcile_index().await {
        Ok(rebuilt) => info!(rebuilt, "startup search index reconciliation complete"),
        Err(error) => error!(%error, "startup search index reconciliation failed"),
    }
}

/// Build a `TaskScheduler`-compatible closure that recomputes every
/// application's `chats_count` and every chat's `messages_count`.
///
/// Intended to be registered on `COUNT_RECONCILE_INTERVAL_SECS`, expressed as
/// a cron expression by the caller.
pub fn create_count_reconcile_task(
    service: Arc<ReconcileService>,
) -> impl Fn() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), String>> + Send>>
+ Send
+ Sync
+ 'static {
    move || {
        let service = Arc::clone(&service);
        Box::pin(async move {
            service
                .reconcile_counts()
                .await
                .map(|(apps, chats)| {
                    info!(apps, chats, "interval count reconciliation complete");
                })
                .map_err(|error| error.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::ports::{MockCounterStore, MockLogStore, MockSearchIndex};
    use domain::value_objects::AppId;

    use super::*;

    fn reconcile_service() -> ReconcileService {
        let mut log_store = MockLogStore::new();
        log_store
            .expect_list_application_ids()
            .returning(|| Ok(vec![AppId::new()]));
        log_store
            .expect_recompute_and_store_chats_count()
            .returning(|_| Ok(()));
        log_store.expect_list_chat_ids().returning(|_| Ok(vec![]));

        let counters = MockCounterStore::new();
        let search = MockSearchIndex::new();

        ReconcileService::new(Arc::new(log_store), Arc::new(counters), Arc::new(search))
    }

    #[tokio::test]
    async fn count_reconcile_task_runs_successfully() {
        let service = Arc::new(reconcile_service());
        let task = create_count_reconcile_task(service);
        assert!(task().await.is_ok());
    }

    #[tokio::test]
    async fn startup_reconcilers_do_not_panic_on_success() {
        let mut log_store = MockLogStore::new();
        log_store
            .expect_list_application_ids()
            .returning(|| Ok(vec![]));
        log_store
            .expect_total_message_count()
            .returning(|| Ok(0));

        let mut search = MockSearchIndex::new();
        search.expect_document_count().returning(|| Ok(0));

        let counters = MockCounterStore::new();

        let service = ReconcileService::new(Arc::new(log_store), Arc::new(counters), Arc::new(search));

        run_counter_reconciliation(&service, 50).await;
        run_index_reconciliation(&service).await;
    }
}
