//! Command handlers, one module per command group.

mod expenses;
mod income;
mod maintenance;
mod misc;
mod summary;
mod target;

pub use expenses::{handle_add_expense, handle_list_expenses};
pub use income::{handle_income_set, handle_income_show};
pub use maintenance::{handle_backup, handle_check, handle_clear, handle_init};
pub use misc::handle_completions;
pub use summary::handle_summary;
pub use target::{handle_target_set, handle_target_show};
