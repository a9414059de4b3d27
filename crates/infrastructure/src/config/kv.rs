//! Redis (Counter Store) configuration.

use serde::{Deserialize, Serialize};

/// Redis connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvConfig {
    /// Redis connection URL. When unset/unreachable in development, callers
    /// fall back to the in-memory counter store.
    #[serde(default = "default_url")]
    pub url: String,
}

fn default_url() -> String {
    "redis://localhost:6379".to_string()
}

impl Default for KvConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}
