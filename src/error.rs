//! Error types for the vigil library
//!
//! This module defines all error types that can occur during a scan run.
//! The policy (mirrored from the component contracts) is that recoverable
//! filesystem conditions — an unlistable directory, a file that vanishes
//! between listing and hashing — are handled in place with a warning and
//! never reach this type. What does reach the caller is fatal for the run:
//! most importantly a snapshot that cannot be persisted, since silently
//! continuing would falsify every future comparison.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Results in the vigil library
pub type Result<T> = std::result::Result<T, VigilError>;

/// Main error type for all vigil operations
#[derive(Debug, Error)]
pub enum VigilError {
    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization (config, output)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot storage errors (read side)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot could not be persisted; fatal, the baseline would be lost
    #[error("Storage write failed for {path:?}: {reason}")]
    StorageWriteFailed {
        /// Storage location that could not be written
        path: PathBuf,
        /// Underlying failure description
        reason: String,
    },

    /// Compression errors while persisting a snapshot
    #[error("Compression error: {0}")]
    Compression(String),

    /// Decompression errors while loading a snapshot
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VigilError {
    /// Create a storage error with a custom message
    pub fn storage(msg: impl Into<String>) -> Self {
        VigilError::Storage(msg.into())
    }

    /// Create a compression error with a custom message
    pub fn compression(msg: impl Into<String>) -> Self {
        VigilError::Compression(msg.into())
    }

    /// Create a decompression error with a custom message
    pub fn decompression(msg: impl Into<String>) -> Self {
        VigilError::Decompression(msg.into())
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        VigilError::Internal(msg.into())
    }

    /// Check if this error leaves the persisted baseline out of date
    ///
    /// A failed snapshot write means the stored baseline no longer matches
    /// reality; the next run would re-report every difference again.
    pub fn invalidates_baseline(&self) -> bool {
        matches!(self, VigilError::StorageWriteFailed { .. })
    }
}
