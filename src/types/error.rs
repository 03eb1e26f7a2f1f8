//! Error types for treesync

use std::path::PathBuf;
use thiserror::Error;

/// Error types for treesync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (precondition checks before any work starts)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Post-copy verification failed (size or hash mismatch)
    #[error("Verification failed for {path}: {detail}")]
    Verification { path: PathBuf, detail: String },

    /// Resume state file could not be read or written
    #[error("State file error: {0}")]
    Ledger(String),

    /// Operation was cancelled by the user
    #[error("Operation cancelled")]
    Cancelled,
}

impl SyncError {
    /// Check if this error is a user-initiated cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Cancelled)
    }

    /// Check if this error is a precondition failure (run never started)
    pub fn is_precondition(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::Validation(_))
    }

    /// Check if this error is a post-copy verification failure
    pub fn is_verification(&self) -> bool {
        matches!(self, SyncError::Verification { .. })
    }
}
