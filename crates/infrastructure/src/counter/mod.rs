//! Counter Store — atomic per-parent sequence allocator
//!
//! Redis in production (`INCR`, which is atomic without any client-side
//! locking), an in-memory `Mutex<HashMap>` fallback for local development
//! when `KV_URL` is unreachable and for tests. Deliberately not `DashMap`:
//! `next` and `set`/`reset` need to observe a single, consistently-locked
//! view of the counter rather than per-shard atomics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use application::error::ApplicationError;
use application::ports::CounterStore;

/// Sets `KEYS[1]` to `ARGV[1]` only if it is currently unset or lower,
/// atomically, so a reconcile sweep can never undo a concurrent `next()`.
const SET_IF_GREATER_SCRIPT: &str = r"
local current = tonumber(redis.call('GET', KEYS[1]) or '0')
local candidate = tonumber(ARGV[1])
if candidate > current then
    redis.call('SET', KEYS[1], candidate)
end
return 1
";

/// Redis-backed [`CounterStore`].
#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCounterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCounterStore").finish_non_exhaustive()
    }
}

impl RedisCounterStore {
    /// Connect to `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str) -> Result<Self, ApplicationError> {
        let client = redis::Client::open(url)
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn next(&self, key: &str) -> Result<u64, ApplicationError> {
        let mut conn = self.conn.clone();
        conn.incr(key, 1_u64)
            .await
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<u64, ApplicationError> {
        let mut conn = self.conn.clone();
        let value: Option<u64> = conn
            .get(key)
            .await
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))?;
        Ok(value.unwrap_or(0))
    }

    async fn set(&self, key: &str, value: u64) -> Result<(), ApplicationError> {
        let mut conn = self.conn.clone();
        redis::Script::new(SET_IF_GREATER_SCRIPT)
            .key(key)
            .arg(value)
            .invoke_async::<()>(&mut conn)
            .await
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))
    }

    async fn reset(&self, key: &str) -> Result<(), ApplicationError> {
        let mut conn = self.conn.clone();
        conn.del(key)
            .await
            .map_err(|e| ApplicationError::CounterStore(e.to_string()))
    }
}

/// In-memory fallback [`CounterStore`], used in local development when
/// `KV_URL` is unreachable and as a fake in tests.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, u64>>,
}

impl InMemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn next(&self, key: &str) -> Result<u64, ApplicationError> {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let entry = counters.entry(key.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn get(&self, key: &str) -> Result<u64, ApplicationError> {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        Ok(counters.get(key).copied().unwrap_or(0))
    }

    async fn set(&self, key: &str, value: u64) -> Result<(), ApplicationError> {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let entry = counters.entry(key.to_string()).or_insert(0);
        if value > *entry {
            *entry = value;
        }
        Ok(())
    }

    async fn reset(&self, key: &str) -> Result<(), ApplicationError> {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn next_starts_at_one_and_increments() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.next("k").await.unwrap(), 1);
        assert_eq!(store.next("k").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unset_key_reads_as_zero() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.get("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn set_overwrites_and_reset_clears() {
        let store = InMemoryCounterStore::new();
        store.set("k", 41).await.unwrap();
        assert_eq!(store.next("k").await.unwrap(), 42);

        store.reset("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn set_never_decreases_an_already_advanced_counter() {
        let store = InMemoryCounterStore::new();
        store.next("k").await.unwrap();
        store.next("k").await.unwrap();
        store.next("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 3);

        // A reconcile sweep computing a stale, lower max must not stomp a
        // counter that has already advanced past it.
        store.set("k", 1).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 3);

        store.set("k", 5).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn rebuild_counters_twice_back_to_back_is_idempotent() {
        let store = InMemoryCounterStore::new();
        store.set("k", 7).await.unwrap();
        store.set("k", 7).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn concurrent_next_calls_never_collide() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryCounterStore::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.next("shared").await.unwrap() }));
        }

        let mut results: Vec<u64> = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results.sort_unstable();
        let expected: Vec<u64> = (1..=50).collect();
        assert_eq!(results, expected);
    }
}
