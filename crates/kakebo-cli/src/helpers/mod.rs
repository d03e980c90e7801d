//! Input and parsing helper functions for the CLI.

mod parsing;

// Re-export public API
pub use parsing::resolve_period;
