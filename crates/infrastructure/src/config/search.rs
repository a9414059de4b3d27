//! Meilisearch (Search Index) configuration.

use serde::{Deserialize, Serialize};

/// Meilisearch connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Meilisearch base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Meilisearch API key, if the instance requires one
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_url() -> String {
    "http://localhost:7700".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            api_key: None,
        }
    }
}
