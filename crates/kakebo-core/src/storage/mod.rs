//! Storage layer for the household ledger.
//!
//! - `engine`: bucketed key-value engine over a single SQLite file
//! - `schema`: the collections the ledger stores and their encodings
//! - `codec`: key and value byte encodings
//! - `store`: the ledger store built on the engine
//! - `traits`: the caller-facing `LedgerStorage` interface

pub mod codec;
pub mod engine;
pub mod schema;
pub mod store;
pub mod traits;
pub mod types;

pub use engine::{Bucket, Cursor, Engine, Txn};
pub use store::Store;
pub use traits::LedgerStorage;
pub use types::{
    Category, Expense, NewExpense, PeriodSummary, ScanPolicy, StoreOptions, DEFAULT_LOCK_TIMEOUT,
};
