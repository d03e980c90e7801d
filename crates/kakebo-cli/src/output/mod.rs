//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying expenses and
//! period summaries as JSON or as tables.

mod json;
mod text;

// Re-export public API
pub use json::{expense_json, expenses_json, summary_json};
pub use text::{print_expense_list, print_summary};
