//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use kakebo_core::KakeboError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store file)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput {
        message: String,
        hint: Option<String>,
    },

    /// Store could not be opened (locked, unreadable, not a store)
    StoreUnavailable { message: String, hint: String },

    /// Integrity check failed
    IntegrityFailed { message: String, hint: String },

    /// Anything else
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint }
            | CliError::StoreUnavailable { message, hint }
            | CliError::IntegrityFailed { message, hint } => {
                write!(f, "{}\nHint: {}", message, hint)
            }
            CliError::InvalidInput { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\nHint: {}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::General(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an InvalidInput error with message and hint.
    pub fn invalid_input_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    pub fn integrity_failed(message: impl Into<String>) -> Self {
        CliError::IntegrityFailed {
            message: message.into(),
            hint: "Restore from a backup before retrying.".to_string(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::StoreUnavailable { .. } => exit_codes::STORE_UNAVAILABLE,
            CliError::IntegrityFailed { .. } => exit_codes::INTEGRITY_FAILED,
            CliError::General(_) => 1,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

/// Classify an error returned by a command handler.
///
/// Store errors are matched by downcasting; anything unrecognized exits 1.
pub fn classify(err: anyhow::Error) -> CliError {
    let err = match err.downcast::<CliError>() {
        Ok(cli_err) => return cli_err,
        Err(err) => err,
    };

    match err.downcast_ref::<KakeboError>() {
        Some(store_err @ KakeboError::Open { .. }) => CliError::StoreUnavailable {
            message: store_err.to_string(),
            hint: "Close other kakebo processes using this store, or pass --db.".to_string(),
        },
        Some(store_err) if store_err.is_validation() => {
            CliError::invalid_input(store_err.to_string())
        }
        _ => CliError::General(format!("{:#}", err)),
    }
}
