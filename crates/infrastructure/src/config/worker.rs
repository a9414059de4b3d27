//! Worker pool and reconciler scheduling configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Worker pool and reconciler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent worker tasks draining the job queue
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Whether this process runs workers at all. Set to `false` to run a
    /// front-end-only process, with workers running as a separate process
    /// against the same queue.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Interval between Count reconciler runs
    #[serde(default = "default_count_reconcile_interval_secs")]
    pub count_reconcile_interval_secs: u64,

    /// Number of applications sampled by the startup Counter reconciler
    #[serde(default = "default_counter_reconcile_sample_size")]
    pub counter_reconcile_sample_size: usize,
}

const fn default_concurrency() -> u32 {
    4
}

const fn default_count_reconcile_interval_secs() -> u64 {
    30
}

const fn default_counter_reconcile_sample_size() -> usize {
    50
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            enabled: true,
            count_reconcile_interval_secs: default_count_reconcile_interval_secs(),
            counter_reconcile_sample_size: default_counter_reconcile_sample_size(),
        }
    }
}
