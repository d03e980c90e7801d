//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, store file).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Store could not be opened (locked, unreadable, not a store).
    pub const STORE_UNAVAILABLE: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KAKEBO_CONFIG";

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "KAKEBO_LOG";

/// File name of the store when no path is configured.
pub const DEFAULT_STORE_FILE: &str = "kakebo.db";
