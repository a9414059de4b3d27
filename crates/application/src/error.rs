//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (validation, invariant violation)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Requested application/chat/message does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A `(parent, number)` pair already exists in the durable store
    #[error("conflict: {0}")]
    Conflict(String),

    /// Counter Store is unreachable or returned an error
    #[error("counter store error: {0}")]
    CounterStore(String),

    /// Durable Log Store is unreachable or returned an error
    #[error("log store error: {0}")]
    LogStore(String),

    /// Job Queue is unreachable or returned an error
    #[error("job queue error: {0}")]
    JobQueue(String),

    /// Search Index is unreachable or returned an error
    #[error("search index error: {0}")]
    SearchIndex(String),

    /// Search query was malformed
    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    /// Internal error that doesn't fit another variant
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether a caller may usefully retry the operation unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CounterStore(_) | Self::LogStore(_) | Self::JobQueue(_) | Self::SearchIndex(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_are_retryable() {
        assert!(ApplicationError::CounterStore("timeout".into()).is_retryable());
        assert!(ApplicationError::LogStore("timeout".into()).is_retryable());
        assert!(ApplicationError::JobQueue("timeout".into()).is_retryable());
        assert!(ApplicationError::SearchIndex("timeout".into()).is_retryable());
    }

    #[test]
    fn not_found_is_not_retryable() {
        assert!(!ApplicationError::NotFound("app".into()).is_retryable());
    }

    #[test]
    fn domain_error_converts() {
        let err: ApplicationError = DomainError::validation("name", "can't be blank").into();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}
