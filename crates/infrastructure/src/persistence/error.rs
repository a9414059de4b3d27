//! Shared error mapping for the Postgres persistence adapter

use application::ports::LogStoreError;

/// Postgres error code for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error to a [`LogStoreError`], distinguishing unique-constraint
/// violations (I1/I2, token uniqueness) as [`LogStoreError::Conflict`] from
/// every other failure, which is treated as transient.
pub fn map_sqlx_error(e: sqlx::Error) -> LogStoreError {
    match e {
        sqlx::Error::RowNotFound => LogStoreError::NotFound("row not found".to_string()),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                LogStoreError::Conflict(db_err.to_string())
            } else {
                LogStoreError::Storage(db_err.to_string())
            }
        },
        other => LogStoreError::Storage(other.to_string()),
    }
}
