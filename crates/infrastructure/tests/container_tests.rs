//! Integration tests for the real backing-store adapters, driven against
//! disposable containers (`testcontainers`/`testcontainers-modules`).
//!
//! These require a running Docker daemon and are `#[ignore]`d by default —
//! run with `cargo test --test container_tests -- --ignored`.
#![allow(clippy::expect_used)]

use application::ports::{CounterStore, JobQueue, LogStore};
use application::{Job, JobRecord};
use domain::value_objects::AppId;
use domain::Application;
use infrastructure::testing::{PostgresContainer, RedisContainer};
use infrastructure::{InMemoryJobQueue, PgJobQueue, PgLogStore, RedisCounterStore};
use sqlx::postgres::PgPoolOptions;

#[tokio::test]
#[ignore = "requires Docker"]
async fn pg_log_store_round_trips_an_application() {
    let container = PostgresContainer::start().await.expect("postgres container");
    let pool = PgPoolOptions::new()
        .connect(container.connection_string())
        .await
        .expect("connect to postgres container");

    let store = PgLogStore::new(pool);
    store.migrate().await.expect("run migrations");

    let app = Application::create("Acme Corp".to_string()).expect("valid name");
    store.create_application(&app).await.expect("create application");

    let found = store
        .find_application_by_token(&app.token)
        .await
        .expect("query succeeds")
        .expect("application exists");
    assert_eq!(found.name, "Acme Corp");
    assert_eq!(found.chats_count, 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn pg_log_store_enforces_unique_token() {
    let container = PostgresContainer::start().await.expect("postgres container");
    let pool = PgPoolOptions::new()
        .connect(container.connection_string())
        .await
        .expect("connect to postgres container");

    let store = PgLogStore::new(pool);
    store.migrate().await.expect("run migrations");

    let app = Application::create("Acme Corp".to_string()).expect("valid name");
    store.create_application(&app).await.expect("first insert succeeds");

    let mut duplicate = Application::create("Different Name".to_string()).expect("valid name");
    duplicate.token = app.token.clone();
    let result = store.create_application(&duplicate).await;
    assert!(result.is_err(), "inserting a duplicate token must fail");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn pg_job_queue_claims_in_fifo_order() {
    let container = PostgresContainer::start().await.expect("postgres container");
    let pool = PgPoolOptions::new()
        .connect(container.connection_string())
        .await
        .expect("connect to postgres container");

    sqlx::migrate!("./migrations").run(&pool).await.expect("run migrations");

    let queue = PgJobQueue::new(pool);
    let application_id = AppId::new();
    queue.enqueue(Job::RecomputeAppCount { application_id }).await.expect("enqueue");
    queue.enqueue(Job::ReindexAll).await.expect("enqueue");

    let claimed = queue.claim(10).await.expect("claim");
    assert_eq!(claimed.len(), 2);
    assert!(matches!(claimed[0].job, Job::RecomputeAppCount { .. }));
    assert!(matches!(claimed[1].job, Job::ReindexAll));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn redis_counter_store_increments_atomically() {
    let container = RedisContainer::start().await.expect("redis container");
    let store = RedisCounterStore::connect(container.connection_string())
        .await
        .expect("connect to redis container");

    let key = "chat_app:test:chat_counter";
    assert_eq!(store.next(key).await.expect("next"), 1);
    assert_eq!(store.next(key).await.expect("next"), 2);
    assert_eq!(store.get(key).await.expect("get"), 2);

    store.reset(key).await.expect("reset");
    assert_eq!(store.get(key).await.expect("get"), 0);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn pg_job_queue_defers_reclaim_until_backoff_elapses() {
    use infrastructure::retry::RetryConfig;

    let container = PostgresContainer::start().await.expect("postgres container");
    let pool = PgPoolOptions::new()
        .connect(container.connection_string())
        .await
        .expect("connect to postgres container");
    sqlx::migrate!("./migrations").run(&pool).await.expect("run migrations");

    let queue = PgJobQueue::with_config(pool, RetryConfig::new(200, 1000, 2.0, 5).without_jitter());
    let id = queue.enqueue(Job::ReindexAll).await.expect("enqueue");
    queue.claim(10).await.expect("claim");
    queue.fail(id, "transient").await.expect("fail");

    assert!(queue.claim(10).await.expect("claim").is_empty());

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    let reclaimed = queue.claim(10).await.expect("claim");
    assert_eq!(reclaimed.len(), 1);
    assert_eq!(reclaimed[0].id, id);
}

#[tokio::test]
async fn in_memory_job_queue_fails_unknown_job_id() {
    let queue = InMemoryJobQueue::new();
    let unknown = JobRecord::new(Job::ReindexAll).id;
    let completed = queue.fail(unknown, "boom").await.expect("fail returns a result");
    assert!(!completed, "failing an untracked job id must report false, not error");
}
