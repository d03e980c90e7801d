//! Error types for Kakebo core operations.
//!
//! This module defines the error hierarchy for all store operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Kakebo operations.
pub type Result<T> = std::result::Result<T, KakeboError>;

/// Core error type for Kakebo operations.
#[derive(Debug, Error)]
pub enum KakeboError {
    /// The store file could not be opened (locked, unreadable, or not a store)
    #[error("Failed to open store at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    /// Operation attempted after the store was closed
    #[error("Store is closed")]
    Closed,

    /// Category outside the fixed enumeration
    #[error("Invalid category: \"{0}\" (expected survival, optional, culture or extra)")]
    InvalidCategory(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored record could not be parsed
    #[error("Failed to decode record {key}: {reason}")]
    Decode { key: String, reason: String },

    /// A record could not be serialized
    #[error("Failed to encode record: {0}")]
    Encode(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal invariant broken; the calling command must stop
    #[error("Fatal store error: {0}")]
    Fatal(String),
}

impl KakeboError {
    /// Whether this error indicates a programming or invariant failure
    /// rather than a recoverable condition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Closed | Self::Fatal(_))
    }

    /// Check if this is a validation error (including bad categories)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidCategory(_))
    }
}

impl From<rusqlite::Error> for KakeboError {
    fn from(err: rusqlite::Error) -> Self {
        KakeboError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for KakeboError {
    fn from(err: std::io::Error) -> Self {
        KakeboError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for KakeboError {
    fn from(err: serde_json::Error) -> Self {
        KakeboError::Encode(err.to_string())
    }
}
