//! # Sync Error Types
//!
//! Error types for the mirror processor. Only startup surfaces errors to
//! the caller; once the processor is running, every failed push is logged
//! and dropped so the mirror can never stall local work.

use thiserror::Error;

/// Mirror sync errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The mirror configuration is unusable (e.g. an empty endpoint URL).
    #[error("Invalid mirror configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client construction or request failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
