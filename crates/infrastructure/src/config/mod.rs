//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `database`: Postgres DSN and pool sizing (Durable Log Store)
//! - `kv`: Redis URL (Counter Store)
//! - `search`: Meilisearch URL and API key (Search Index)
//! - `worker`: worker pool and reconciler scheduling knobs

mod database;
mod kv;
mod search;
mod server;
mod worker;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use kv::KvConfig;
pub use search::SearchConfig;
pub use server::ServerConfig;
pub use worker::WorkerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Top-level application configuration, assembled from environment
/// variables with the documented defaults via the `config` crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub kv: KvConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub worker: WorkerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables (unprefixed, matching
    /// the documented `DB_DSN`/`KV_URL`/`SEARCH_URL`/... variable names),
    /// falling back to the defaults below when unset.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.dsn", "postgres://localhost/ingest")?
            .set_default("kv.url", "redis://localhost:6379")?
            .set_default("search.url", "http://localhost:7700")?
            .set_default("worker.concurrency", 4)?
            .set_default("worker.enabled", true)?
            .set_default("worker.count_reconcile_interval_secs", 30)?
            .set_default("worker.counter_reconcile_sample_size", 50)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .separator("_"),
            );

        let built = builder.build()?;
        built.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.dsn, "postgres://localhost/ingest");
        assert_eq!(config.kv.url, "redis://localhost:6379");
        assert!(config.worker.enabled);
    }

    #[test]
    fn app_config_serialization_round_trips() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.server.port, back.server.port);
    }
}
