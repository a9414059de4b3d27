//! Counter Store port — atomic per-parent sequence allocator

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Atomic integer counters keyed by parent entity.
///
/// `next` never returns the same value twice for a given `key`, even under
/// arbitrary concurrency. Numbers handed out are never reused, and a gap
/// (e.g. from a crash between `next` and the persistence job completing) is
/// permanent — the allocator never "returns" a number.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically increment and return the counter for `key`, starting from 1.
    async fn next(&self, key: &str) -> Result<u64, ApplicationError>;

    /// Read the current value of `key` without incrementing it (0 if unset).
    async fn get(&self, key: &str) -> Result<u64, ApplicationError>;

    /// Advance the counter for `key` to `value`, used by the Counter
    /// Reconciler to heal drift after a crash or data loss.
    ///
    /// Never decreases the counter: if the current value is already greater
    /// than or equal to `value`, this is a no-op. An already-advanced
    /// counter is always safe — a concurrent `next()` call may have claimed
    /// a number whose persistence job hasn't landed in the Durable Log Store
    /// yet, and stomping the counter back down would hand that number out
    /// again. Implementations must enforce this themselves rather than
    /// relying on callers to `get` first, since the check-then-set needs to
    /// be atomic with respect to concurrent `next()` calls.
    async fn set(&self, key: &str, value: u64) -> Result<(), ApplicationError>;

    /// Reset `key` to zero. Exposed for tests; production code should prefer
    /// `set` with the reconciled value.
    async fn reset(&self, key: &str) -> Result<(), ApplicationError>;
}
