//! Store error types.

use std::path::PathBuf;

use bursar_core::repository::RepositoryError;
use bursar_shared::AppError;
use thiserror::Error;

/// Snapshot store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Snapshot file could not be read or written.
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Snapshot content is not valid.
    #[error("invalid snapshot {path}: {source}")]
    Parse {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Snapshot could not be encoded as JSON.
    #[error("failed to encode snapshot for {path}: {source}")]
    Serialize {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// Two records share an ID or a plan year.
    #[error("duplicate {kind}: {key}")]
    Duplicate {
        /// Record kind.
        kind: &'static str,
        /// Offending key.
        key: String,
    },

    /// Internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Parse { .. } | StoreError::Duplicate { .. } => {
                Self::Corrupt(err.to_string())
            }
            StoreError::Io { .. } | StoreError::Serialize { .. } | StoreError::Poisoned => {
                Self::Unavailable(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}
