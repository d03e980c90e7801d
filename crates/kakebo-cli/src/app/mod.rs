//! Application-level utilities for the Kakebo CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The per-invocation context that opens the store

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
