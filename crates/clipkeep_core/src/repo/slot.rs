//! Key-value slot contract and backends.
//!
//! # Responsibility
//! - Read and overwrite one string value per fixed key.
//! - Keep SQL details inside the slot boundary.
//!
//! # Invariants
//! - `write` fully replaces the previous value for that key.
//! - Backends never interpret the stored value.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SlotResult<T> = Result<T, SlotError>;

/// Failure while touching durable slot storage.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    /// Storage cannot be used in the current process (missing, full, revoked).
    Unavailable(String),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "slot storage unavailable: {reason}"),
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string slot addressed by a fixed key.
pub trait KeyValueSlot {
    /// Returns the stored value, or `None` when the key was never written.
    fn read(&self, key: &str) -> SlotResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> SlotResult<()>;
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for &S {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        (**self).write(key, value)
    }
}

/// SQLite-backed slot stored in the `kv_slots` table.
pub struct SqliteKeyValueSlot<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueSlot<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueSlot for SqliteKeyValueSlot<'_> {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=slot_write module=repo status=ok backend=sqlite bytes={}",
            value.len()
        );
        Ok(())
    }
}

/// Process-local slot used by tests and storage-less sessions.
///
/// Can be flipped to unavailable to simulate a missing or full backend.
#[derive(Debug, Default)]
pub struct MemoryKeyValueSlot {
    values: RefCell<BTreeMap<String, String>>,
    unavailable: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryKeyValueSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles simulated unavailability for both reads and writes.
    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Returns the raw stored value without going through availability checks.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn ensure_available(&self) -> SlotResult<()> {
        if self.unavailable.get() {
            return Err(SlotError::Unavailable(
                "memory slot marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueSlot for MemoryKeyValueSlot {
    fn read(&self, key: &str) -> SlotResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: &str) -> SlotResult<()> {
        self.ensure_available()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
