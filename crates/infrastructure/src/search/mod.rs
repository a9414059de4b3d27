//! Search Index module
//!
//! A secondary index over message bodies, supporting case-insensitive
//! substring search scoped to a single chat: Meilisearch in production,
//! in-memory for local development and tests.

mod in_memory_search_index;
mod meilisearch_index;

pub use in_memory_search_index::InMemorySearchIndex;
pub use meilisearch_index::MeilisearchIndex;
