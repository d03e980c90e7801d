//! # Kakebo Core
//!
//! Core library for Kakebo - a personal household-finance ledger that records
//! expenses, income and savings goals per period.
//!
//! This crate provides the storage layer and data model independent of the
//! CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: bucketed key-value engine, record codec and the ledger store
//! - **period**: month/week period keys
//! - **clock**: injected source of the current date
//!
//! ## Example
//!
//! ```no_run
//! use kakebo_core::storage::{Category, LedgerStorage, NewExpense, Store};
//! use kakebo_core::period::Period;
//!
//! # fn main() -> kakebo_core::Result<()> {
//! let mut store = Store::open(std::path::Path::new("kakebo.db"))?;
//! let period = Period::month("June", "2017");
//! store.add_expense(NewExpense::new("Toothpaste", Category::Survival, 5, period.clone()))?;
//! let june = store.list_expenses_for_period(&period.key())?;
//! assert_eq!(june.len(), 1);
//! store.close()?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod fs;
pub mod period;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{KakeboError, Result};
pub use period::{Period, PeriodKey, PeriodKind};
pub use storage::{LedgerStorage, Store};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
