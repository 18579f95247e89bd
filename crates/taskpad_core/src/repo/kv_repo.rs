//! Key/value slot repository.
//!
//! # Responsibility
//! - Provide get/put/remove over named text slots.
//! - Offer a SQLite implementation for real use and an in-memory one for
//!   tests and ephemeral sessions.
//!
//! # Invariants
//! - Keys are non-empty after trimming.
//! - `put` is an upsert: one write call per slot update.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
    /// Writes are refused by the backend.
    ReadOnly(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid slot key `{key}`"),
            Self::ReadOnly(key) => write!(f, "slot `{key}` is read-only"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with `open_db`"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Slot-level storage contract.
pub trait KeyValueStore {
    /// Reads one slot. Returns `None` when the slot was never written.
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    /// Replaces one slot value.
    fn put(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes one slot. Deleting a missing slot is not an error.
    fn remove(&self, key: &str) -> RepoResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`].
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when `kv_slots` is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_slots'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("kv_slots"));
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT slot_value FROM kv_slots WHERE slot_key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO kv_slots (slot_key, slot_value)
             VALUES (?1, ?2)
             ON CONFLICT(slot_key) DO UPDATE SET
                slot_value = excluded.slot_value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn
            .execute("DELETE FROM kv_slots WHERE slot_key = ?1;", [key])?;
        Ok(())
    }
}

/// In-memory slot repository.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    slots: RefCell<BTreeMap<String, String>>,
    read_only: Cell<bool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail with [`RepoError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        if self.read_only.get() {
            return Err(RepoError::ReadOnly(key.to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        if self.read_only.get() {
            return Err(RepoError::ReadOnly(key.to_string()));
        }
        self.slots.borrow_mut().remove(key);
        Ok(())
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
