//! Bucketed key-value engine over a single SQLite file.
//!
//! The engine exposes named buckets with ordered byte keys, atomic read and
//! write transactions, and a persistent per-bucket sequence counter. It knows
//! nothing about ledger records; [`crate::storage::Store`] builds on top.
//!
//! The file is opened in SQLite's exclusive locking mode and the lock is
//! taken during [`Engine::open`], so a second process fails at open time
//! after waiting at most the configured lock timeout.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, TransactionBehavior};

use crate::error::{KakeboError, Result};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS buckets (
        name TEXT PRIMARY KEY,
        sequence INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS entries (
        bucket TEXT NOT NULL,
        key BLOB NOT NULL,
        value BLOB NOT NULL,

        PRIMARY KEY (bucket, key),
        FOREIGN KEY (bucket) REFERENCES buckets(name) ON DELETE CASCADE
    ) WITHOUT ROWID;
"#;

/// Handle to an open key-value file.
pub struct Engine {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl Engine {
    /// Open (creating if absent) the file at `path` and take its lock.
    ///
    /// # Errors
    ///
    /// Returns `KakeboError::Open` if:
    /// - Another process holds the file past `lock_timeout`
    /// - The file or its directory cannot be created or read
    /// - The file is not a valid store
    pub fn open(path: &Path, lock_timeout: Duration) -> Result<Self> {
        let open_error = |reason: String| KakeboError::Open {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    open_error(format!("cannot create directory {}: {}", parent.display(), e))
                })?;
            }
        }

        let mut conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| open_error(describe_open_error(&e, lock_timeout)))?;

        Self::configure(&mut conn, lock_timeout)
            .map_err(|e| open_error(describe_open_error(&e, lock_timeout)))?;

        tracing::debug!(path = %path.display(), "opened store file");

        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Open a private in-memory engine with the same schema.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&mut conn, Duration::ZERO)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(Some(conn)),
        })
    }

    fn configure(conn: &mut Connection, lock_timeout: Duration) -> rusqlite::Result<()> {
        conn.busy_timeout(lock_timeout)?;
        conn.pragma_update_and_check(None, "locking_mode", "EXCLUSIVE", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // The exclusive transaction both creates the schema and acquires the
        // file lock, which exclusive locking mode then keeps until close.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Exclusive)?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock the connection slot, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn
            .lock()
            .map_err(|_| KakeboError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Run `f` inside a write transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Txn<'_>) -> Result<T>,
    {
        let mut guard = self.lock_conn()?;
        let conn = guard.as_mut().ok_or(KakeboError::Closed)?;
        let txn = Txn {
            tx: conn.transaction_with_behavior(TransactionBehavior::Immediate)?,
            writable: true,
        };
        let value = f(&txn)?;
        txn.tx.commit()?;
        Ok(value)
    }

    /// Run `f` inside a read-only transaction.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Txn<'_>) -> Result<T>,
    {
        let mut guard = self.lock_conn()?;
        let conn = guard.as_mut().ok_or(KakeboError::Closed)?;
        let txn = Txn {
            tx: conn.transaction_with_behavior(TransactionBehavior::Deferred)?,
            writable: false,
        };
        let value = f(&txn)?;
        txn.tx.rollback()?;
        Ok(value)
    }

    /// Write a consistent copy of the whole file to `dest`, which must not
    /// exist yet.
    pub fn vacuum_into(&self, dest: &Path) -> Result<()> {
        let guard = self.lock_conn()?;
        let conn = guard.as_ref().ok_or(KakeboError::Closed)?;
        let dest = dest
            .to_str()
            .ok_or_else(|| KakeboError::Storage("Backup path is not valid UTF-8".to_string()))?;
        conn.execute("VACUUM INTO ?1", [dest])?;
        Ok(())
    }

    /// Run SQLite's foreign key check, returning the number of violations.
    pub(crate) fn foreign_key_violations(&self) -> Result<usize> {
        let guard = self.lock_conn()?;
        let conn = guard.as_ref().ok_or(KakeboError::Closed)?;
        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Release the file. Further calls fail with `KakeboError::Closed`.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock_conn()?;
        let conn = guard.take().ok_or(KakeboError::Closed)?;
        conn.close().map_err(|(_, e)| KakeboError::Storage(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "closed store file");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.conn.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }
}

fn describe_open_error(err: &rusqlite::Error, lock_timeout: Duration) -> String {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => format!(
            "file is locked by another process (waited {} ms)",
            lock_timeout.as_millis()
        ),
        Some(ErrorCode::NotADatabase) | Some(ErrorCode::DatabaseCorrupt) => {
            "file is not a valid store".to_string()
        }
        Some(ErrorCode::PermissionDenied) | Some(ErrorCode::CannotOpen) => {
            format!("cannot open file: {}", err)
        }
        _ => err.to_string(),
    }
}

/// An open transaction.
pub struct Txn<'conn> {
    tx: rusqlite::Transaction<'conn>,
    writable: bool,
}

impl<'conn> Txn<'conn> {
    pub fn writable(&self) -> bool {
        self.writable
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(KakeboError::Storage(
                "write attempted in a read-only transaction".to_string(),
            ))
        }
    }

    fn bucket_exists(&self, name: &str) -> Result<bool> {
        let exists: bool = self.tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM buckets WHERE name = ?1)",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Look up an existing bucket.
    ///
    /// A missing bucket means the store was not bootstrapped, which is
    /// reported as fatal.
    pub fn bucket(&self, name: &str) -> Result<Bucket<'_>> {
        if !self.bucket_exists(name)? {
            return Err(KakeboError::Fatal(format!("bucket \"{}\" does not exist", name)));
        }
        Ok(Bucket {
            txn: self,
            name: name.to_string(),
        })
    }

    pub fn create_bucket_if_not_exists(&self, name: &str) -> Result<Bucket<'_>> {
        self.ensure_writable()?;
        self.tx.execute(
            "INSERT OR IGNORE INTO buckets (name, sequence) VALUES (?1, 0)",
            [name],
        )?;
        Ok(Bucket {
            txn: self,
            name: name.to_string(),
        })
    }

    /// Delete a bucket, its entries and its sequence counter.
    pub fn delete_bucket(&self, name: &str) -> Result<()> {
        self.ensure_writable()?;
        let removed = self
            .tx
            .execute("DELETE FROM buckets WHERE name = ?1", [name])?;
        if removed == 0 {
            return Err(KakeboError::Storage(format!(
                "bucket \"{}\" does not exist",
                name
            )));
        }
        Ok(())
    }

    pub fn bucket_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.tx.prepare("SELECT name FROM buckets ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }
}

/// A named keyspace inside a transaction.
pub struct Bucket<'txn> {
    txn: &'txn Txn<'txn>,
    name: String,
}

impl Bucket<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self
            .txn
            .tx
            .query_row(
                "SELECT value FROM entries WHERE bucket = ?1 AND key = ?2",
                params![self.name, key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.txn.ensure_writable()?;
        if key.is_empty() {
            return Err(KakeboError::Validation("key must not be empty".to_string()));
        }
        self.txn.tx.execute(
            "INSERT OR REPLACE INTO entries (bucket, key, value) VALUES (?1, ?2, ?3)",
            params![self.name, key, value],
        )?;
        Ok(())
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.txn.ensure_writable()?;
        self.txn.tx.execute(
            "DELETE FROM entries WHERE bucket = ?1 AND key = ?2",
            params![self.name, key],
        )?;
        Ok(())
    }

    /// Current value of the sequence counter.
    pub fn sequence(&self) -> Result<u64> {
        let value: i64 = self.txn.tx.query_row(
            "SELECT sequence FROM buckets WHERE name = ?1",
            [&self.name],
            |row| row.get(0),
        )?;
        u64::try_from(value).map_err(|_| {
            KakeboError::Fatal(format!("negative sequence in bucket \"{}\"", self.name))
        })
    }

    pub fn set_sequence(&self, value: u64) -> Result<()> {
        self.txn.ensure_writable()?;
        let value = i64::try_from(value)
            .map_err(|_| KakeboError::Fatal(format!("sequence overflow in \"{}\"", self.name)))?;
        self.txn.tx.execute(
            "UPDATE buckets SET sequence = ?1 WHERE name = ?2",
            params![value, self.name],
        )?;
        Ok(())
    }

    /// Increment and return the sequence counter.
    ///
    /// The counter lives in the file and moves with the enclosing
    /// transaction, so a rolled-back insert does not consume a value.
    pub fn next_sequence(&self) -> Result<u64> {
        let next = self
            .sequence()?
            .checked_add(1)
            .ok_or_else(|| KakeboError::Fatal(format!("sequence overflow in \"{}\"", self.name)))?;
        self.set_sequence(next)?;
        Ok(next)
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self.txn.tx.query_row(
            "SELECT COUNT(*) FROM entries WHERE bucket = ?1",
            [&self.name],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of every pair in ascending byte order of the key.
    pub fn cursor(&self) -> Result<Cursor> {
        let mut stmt = self
            .txn
            .tx
            .prepare("SELECT key, value FROM entries WHERE bucket = ?1 ORDER BY key")?;
        let pairs = stmt
            .query_map([&self.name], |row| {
                Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Cursor {
            pairs: pairs.into_iter(),
        })
    }
}

/// Ascending iterator over a bucket's key-value pairs.
pub struct Cursor {
    pairs: std::vec::IntoIter<(Vec<u8>, Vec<u8>)>,
}

impl Iterator for Cursor {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}
