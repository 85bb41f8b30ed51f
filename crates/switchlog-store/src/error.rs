//! Error types for switchlog-store.

use std::path::PathBuf;

use switchlog_types::ValidationError;

/// Result type for switchlog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in switchlog-store.
///
/// The two classes the transport cares about are validation failures
/// (reject the submission, client error) and everything else (storage
/// fault, server error). Use [`Error::is_validation`] to distinguish them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The event batch failed precondition checks. Raised before any
    /// storage access; the batch caused zero mutations.
    #[error("invalid event batch: {0}")]
    Validation(#[from] ValidationError),

    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database was created by a newer version of this crate.
    #[error("database schema version {found} is newer than supported {supported}")]
    SchemaTooNew { found: i32, supported: i32 },

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a client-side validation failure rather than
    /// a storage fault.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_class_is_distinguished() {
        let err = Error::from(ValidationError::EmptyBatch);
        assert!(err.is_validation());

        let err = Error::from(rusqlite::Error::InvalidQuery);
        assert!(!err.is_validation());
    }
}
