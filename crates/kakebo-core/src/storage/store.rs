//! Ledger store backed by the bucketed engine.
//!
//! Owns the `expenses`, `incomes` and `savings` buckets. Expense identifiers
//! come from the persistent sequence of the `expenses` bucket, and expense
//! keys are 8-byte big-endian identifiers, so a cursor over the bucket walks
//! expenses in insertion order.

use std::path::Path;

use crate::error::{KakeboError, Result};
use crate::period::PeriodKey;
use crate::storage::codec::{
    decode_amount, decode_expense, decode_id, encode_amount, encode_expense, ID_KEY_LEN,
};
use crate::storage::engine::{Engine, Txn};
use crate::storage::schema::{self, Collection, Key, ValueCodec};
use crate::storage::traits::LedgerStorage;
use crate::storage::types::{Expense, NewExpense, ScanPolicy, StoreOptions};

/// The household ledger store.
pub struct Store {
    engine: Engine,
    options: StoreOptions,
}

impl Store {
    /// Open the store at `path` with default options.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open the store at `path`, creating the file and its buckets if needed.
    ///
    /// # Errors
    ///
    /// Returns `KakeboError::Open` if the file is locked by another process
    /// past `options.lock_timeout`, cannot be read, or is not a store.
    pub fn open_with(path: &Path, options: StoreOptions) -> Result<Self> {
        let engine = Engine::open(path, options.lock_timeout)?;
        Self::bootstrap(&engine).map_err(|e| KakeboError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { engine, options })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory(options: StoreOptions) -> Result<Self> {
        let engine = Engine::open_in_memory()?;
        Self::bootstrap(&engine)?;
        Ok(Self { engine, options })
    }

    fn bootstrap(engine: &Engine) -> Result<()> {
        engine.update(|txn| {
            for collection in schema::ALL {
                txn.create_bucket_if_not_exists(collection.name)?;
            }
            Ok(())
        })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn path(&self) -> &Path {
        self.engine.path()
    }

    pub fn is_closed(&self) -> bool {
        self.engine.is_closed()
    }

    /// Write a consistent snapshot of the store to `destination`,
    /// replacing any existing file there.
    pub fn backup_to(&self, destination: &Path) -> Result<()> {
        let temp_path = crate::fs::sibling_temp_path(destination)?;
        if let Err(err) = self.engine.vacuum_into(&temp_path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(err);
        }
        crate::fs::rename_with_fallback(&temp_path, destination)
            .map_err(|e| KakeboError::Storage(format!("Atomic rename failed: {}", e)))?;

        tracing::info!(destination = %destination.display(), "wrote store backup");
        Ok(())
    }

    fn scan_expenses<F>(&self, mut keep: F) -> Result<Vec<Expense>>
    where
        F: FnMut(&Expense) -> bool,
    {
        let policy = self.options.scan_policy;
        self.engine.view(|txn| {
            let bucket = txn.bucket(schema::EXPENSES.name)?;
            let mut expenses = Vec::new();
            for (key, value) in bucket.cursor()? {
                match decode_expense(&key, &value) {
                    Ok(expense) => {
                        if keep(&expense) {
                            expenses.push(expense);
                        }
                    }
                    Err(err) => match policy {
                        ScanPolicy::Abort => return Err(err),
                        ScanPolicy::Skip => {
                            tracing::warn!(
                                key = %schema::EXPENSES.display_key(&key),
                                error = %err,
                                "skipping undecodable expense record"
                            );
                        }
                    },
                }
            }
            Ok(expenses)
        })
    }

    fn read_text(&self, collection: Collection, period: &PeriodKey) -> Result<Option<Vec<u8>>> {
        let key = collection.encode_key(Key::Period(period))?;
        self.engine
            .view(|txn| txn.bucket(collection.name)?.get(&key))
    }

    fn write_text(&self, collection: Collection, period: &PeriodKey, value: &[u8]) -> Result<()> {
        let key = collection.encode_key(Key::Period(period))?;
        self.engine
            .update(|txn| txn.bucket(collection.name)?.put(&key, value))
    }
}

fn check_collection(txn: &Txn<'_>, collection: Collection) -> Result<()> {
    let bucket = txn.bucket(collection.name)?;
    let sequence = bucket.sequence()?;
    for (key, value) in bucket.cursor()? {
        match collection.value {
            ValueCodec::Json => {
                if key.len() != ID_KEY_LEN {
                    return Err(KakeboError::Storage(format!(
                        "{} has a key of {} bytes",
                        collection.name,
                        key.len()
                    )));
                }
                let expense = decode_expense(&key, &value)?;
                if decode_id(&key) != Some(expense.id) {
                    return Err(KakeboError::Storage(format!(
                        "{} holds record with id {}",
                        collection.display_key(&key),
                        expense.id
                    )));
                }
                if expense.id > sequence {
                    return Err(KakeboError::Storage(format!(
                        "{} is ahead of the bucket sequence ({})",
                        collection.display_key(&key),
                        sequence
                    )));
                }
            }
            ValueCodec::Text => {
                if std::str::from_utf8(&key).is_err() || std::str::from_utf8(&value).is_err() {
                    return Err(KakeboError::Storage(format!(
                        "{} is not valid text",
                        collection.display_key(&key)
                    )));
                }
            }
        }
    }
    Ok(())
}

impl LedgerStorage for Store {
    fn close(&mut self) -> Result<()> {
        self.engine.close()
    }

    fn add_expense(&mut self, expense: NewExpense) -> Result<u64> {
        if expense.description.trim().is_empty() {
            return Err(KakeboError::Validation(
                "Expense description must not be empty".to_string(),
            ));
        }
        if expense.period.kind() != self.options.period_kind {
            return Err(KakeboError::Validation(format!(
                "Store uses {} periods, got a {} period",
                self.options.period_kind,
                expense.period.kind()
            )));
        }

        let id = self.engine.update(|txn| {
            let bucket = txn.bucket(schema::EXPENSES.name)?;
            let id = bucket.next_sequence()?;
            let record = expense.into_expense(id);
            let key = schema::EXPENSES.encode_key(Key::Id(id))?;
            bucket.put(&key, &encode_expense(&record)?)?;
            Ok(id)
        })?;

        tracing::debug!(id, "stored expense");
        Ok(id)
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.scan_expenses(|_| true)
    }

    fn list_expenses_for_period(&self, period: &PeriodKey) -> Result<Vec<Expense>> {
        self.scan_expenses(|expense| expense.period.key() == *period)
    }

    fn set_income(&mut self, period: &PeriodKey, amount: i64) -> Result<()> {
        self.write_text(schema::INCOMES, period, &encode_amount(amount))?;
        tracing::debug!(period = %period, amount, "stored income");
        Ok(())
    }

    fn get_income(&self, period: &PeriodKey) -> Result<i64> {
        Ok(self
            .read_text(schema::INCOMES, period)?
            .map(|value| decode_amount(&value))
            .unwrap_or(0))
    }

    fn set_savings_goal(&mut self, period: &PeriodKey, amount: &str) -> Result<()> {
        self.write_text(schema::SAVINGS, period, amount.as_bytes())?;
        tracing::debug!(period = %period, amount, "stored savings goal");
        Ok(())
    }

    fn get_savings_goal(&self, period: &PeriodKey) -> Result<i64> {
        Ok(self
            .read_text(schema::SAVINGS, period)?
            .map(|value| decode_amount(&value))
            .unwrap_or(0))
    }

    fn savings_goal_raw(&self, period: &PeriodKey) -> Result<Option<String>> {
        Ok(self
            .read_text(schema::SAVINGS, period)?
            .map(|value| String::from_utf8_lossy(&value).into_owned()))
    }

    fn clear(&mut self) -> Result<()> {
        self.engine.update(|txn| {
            for collection in schema::ALL {
                let sequence = txn.bucket(collection.name)?.sequence()?;
                txn.delete_bucket(collection.name)?;
                txn.create_bucket_if_not_exists(collection.name)?
                    .set_sequence(sequence)?;
            }
            Ok(())
        })?;
        tracing::debug!(path = %self.path().display(), "cleared store");
        Ok(())
    }

    fn check_integrity(&self) -> Result<()> {
        self.engine.view(|txn| {
            let names = txn.bucket_names()?;
            for collection in schema::ALL {
                if !names.iter().any(|name| name == collection.name) {
                    return Err(KakeboError::Storage(format!(
                        "bucket \"{}\" is missing",
                        collection.name
                    )));
                }
                check_collection(txn, collection)?;
            }
            Ok(())
        })?;

        if self.engine.foreign_key_violations()? > 0 {
            return Err(KakeboError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        if !self.engine.is_closed() {
            let _ = self.engine.close();
        }
    }
}
