//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod counter_store;
mod job_queue;
mod log_store;
mod search_index;

pub use counter_store::CounterStore;
pub use job_queue::{JobQueue, JobQueueError};
pub use log_store::{LogStore, LogStoreError};
pub use search_index::{MessageDocument, SearchIndex, SearchIndexError};

use crate::error::ApplicationError;

impl From<LogStoreError> for ApplicationError {
    fn from(err: LogStoreError) -> Self {
        match err {
            LogStoreError::Conflict(msg) => Self::Conflict(msg),
            LogStoreError::NotFound(msg) => Self::NotFound(msg),
            LogStoreError::Storage(msg) => Self::LogStore(msg),
        }
    }
}

impl From<JobQueueError> for ApplicationError {
    fn from(err: JobQueueError) -> Self {
        Self::JobQueue(err.to_string())
    }
}

impl From<SearchIndexError> for ApplicationError {
    fn from(err: SearchIndexError) -> Self {
        Self::SearchIndex(err.to_string())
    }
}
