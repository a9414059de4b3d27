//! Chat ingest server entry point.
//!
//! Loads configuration, connects to Postgres/Redis/Meilisearch (falling back
//! to in-memory adapters for local development when a dependency is
//! unreachable), runs the startup reconcilers, optionally starts the worker
//! pool and the interval Count reconciler, then serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use application::ports::{CounterStore, JobQueue, LogStore, SearchIndex};
use application::services::WorkerService;
use infrastructure::{
    AppConfig, InMemoryCounterStore, InMemoryJobQueue, InMemoryLogStore, InMemorySearchIndex,
    LogFormat, MeilisearchIndex, PgJobQueue, PgLogStore, RedisCounterStore, SchedulerConfig,
    TaskScheduler, init_telemetry, reconcile,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use presentation_http::{SecurityHeadersLayer, create_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let log_format: LogFormat = config.server.log_format.parse().unwrap_or_default();
    init_telemetry(log_format);

    let pool = connect_postgres(&config).await;
    let (log_store, queue) = build_postgres_adapters(&config, pool).await;
    let counters = build_counter_store(&config).await;
    let search = build_search_index(&config);

    let reconcile_service = application::services::ReconcileService::new(
        Arc::clone(&log_store),
        Arc::clone(&counters),
        Arc::clone(&search),
    );
    reconcile::run_counter_reconciliation(&reconcile_service, config.worker.counter_reconcile_sample_size).await;
    reconcile::run_index_reconciliation(&reconcile_service).await;

    let state = AppState::new(
        Arc::clone(&log_store),
        Arc::clone(&counters),
        Arc::clone(&queue),
        Arc::clone(&search),
        Arc::new(config.clone()),
    );

    // Kept alive for the process lifetime: dropping it would stop the cron job.
    let _count_reconcile_scheduler = if config.worker.enabled {
        spawn_worker_pool(
            Arc::clone(&log_store),
            Arc::clone(&queue),
            Arc::clone(&search),
            Arc::clone(&counters),
            config.worker.concurrency,
        );
        Some(spawn_count_reconciler(Arc::clone(&state.reconcile), config.worker.count_reconcile_interval_secs).await?)
    } else {
        None
    };

    let app = create_router(state).layer(SecurityHeadersLayer::new()).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "ingest server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_postgres(config: &AppConfig) -> Option<sqlx::PgPool> {
    match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.dsn)
        .await
    {
        Ok(pool) => Some(pool),
        Err(error) => {
            warn!(%error, dsn = %config.database.dsn, "postgres unreachable, falling back to in-memory adapters");
            None
        },
    }
}

/// Build the Durable Log Store and Job Queue from a shared Postgres pool,
/// falling back to their in-memory counterparts together when the pool is
/// unavailable or migrations fail.
async fn build_postgres_adapters(
    config: &AppConfig,
    pool: Option<sqlx::PgPool>,
) -> (Arc<dyn LogStore>, Arc<dyn JobQueue>) {
    let Some(pool) = pool else {
        return (Arc::new(InMemoryLogStore::new()), Arc::new(InMemoryJobQueue::new()));
    };

    let store = PgLogStore::new(pool.clone());
    if config.database.run_migrations {
        if let Err(error) = store.migrate().await {
            warn!(%error, "failed to run migrations, falling back to in-memory adapters");
            return (Arc::new(InMemoryLogStore::new()), Arc::new(InMemoryJobQueue::new()));
        }
    }

    (Arc::new(store), Arc::new(PgJobQueue::new(pool)))
}

async fn build_counter_store(config: &AppConfig) -> Arc<dyn CounterStore> {
    match RedisCounterStore::connect(&config.kv.url).await {
        Ok(store) => Arc::new(store),
        Err(error) => {
            warn!(%error, url = %config.kv.url, "redis unreachable, falling back to in-memory counter store");
            Arc::new(InMemoryCounterStore::new())
        },
    }
}

fn build_search_index(config: &AppConfig) -> Arc<dyn SearchIndex> {
    match MeilisearchIndex::new(&config.search.url, config.search.api_key.as_deref()) {
        Ok(index) => Arc::new(index),
        Err(error) => {
            warn!(%error, url = %config.search.url, "meilisearch unreachable, falling back to in-memory search index");
            Arc::new(InMemorySearchIndex::new())
        },
    }
}

/// Drain the Job Queue with `concurrency` concurrent polling loops.
fn spawn_worker_pool(
    log_store: Arc<dyn LogStore>,
    queue: Arc<dyn JobQueue>,
    search: Arc<dyn SearchIndex>,
    counters: Arc<dyn CounterStore>,
    concurrency: u32,
) {
    const BATCH_SIZE: usize = 10;
    const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

    for worker_id in 0..concurrency {
        let worker = WorkerService::new(
            Arc::clone(&log_store),
            Arc::clone(&queue),
            Arc::clone(&search),
            Arc::clone(&counters),
        );
        tokio::spawn(async move {
            loop {
                match worker.run_once(BATCH_SIZE).await {
                    Ok(0) => tokio::time::sleep(IDLE_POLL_INTERVAL).await,
                    Ok(_) => {},
                    Err(error) => {
                        warn!(worker_id, %error, "worker poll failed");
                        tokio::time::sleep(IDLE_POLL_INTERVAL).await;
                    },
                }
            }
        });
    }
}

async fn spawn_count_reconciler(
    service: Arc<application::services::ReconcileService>,
    interval_secs: u64,
) -> anyhow::Result<TaskScheduler> {
    let scheduler = TaskScheduler::new(SchedulerConfig::default()).await?;
    let cron = format!("*/{interval_secs} * * * * *");
    scheduler
        .add_task("count_reconcile", &cron, reconcile::create_count_reconcile_task(service))
        .await?;
    Ok(scheduler)
}
