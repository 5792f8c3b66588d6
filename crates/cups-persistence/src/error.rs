//! Persistence error types.

use std::path::PathBuf;

use thiserror::Error;

use cups_core::StoreError;

/// Registry file operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("failed to {operation} registry file {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a registry document.
    #[error("invalid registry file {path}: {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// The file was written by a newer schema than this build supports.
    #[error("registry file version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Another writer changed the file since this store last read or
    /// wrote it; saving would clobber their records. The caller re-opens
    /// and retries.
    #[error("registry file was modified by another writer: {path}")]
    ExternalModification { path: PathBuf },

    /// Atomic write failed (temp file could not be renamed into place).
    #[error("failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("failed to serialize registry data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization error.
    #[error("failed to deserialize registry data from {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(error: PersistenceError) -> Self {
        StoreError::Backend {
            source: Box::new(error),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
