//! Durable string key-value storage.
//!
//! [`KeyValueStore`] is the seam the persistence adapter writes through.  The
//! SQLite-backed [`Database`] is the durable implementation; [`MemoryStore`]
//! keeps everything in a map and is used for tests and throwaway sessions.

use std::collections::BTreeMap;

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;

pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Store several entries.  Implementations that can should make this
    /// all-or-nothing.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Remove `key`.  Returns `true` if an entry was deleted.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// Remove several keys, all-or-nothing where the backend allows.
    /// Returns how many entries were deleted.
    fn remove_many(&mut self, keys: &[&str]) -> Result<usize> {
        let mut removed = 0;
        for key in keys {
            if self.remove(key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn_mut().transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
            )?;
            for (key, value) in entries {
                stmt.execute(params![key, value, now])?;
            }
        }
        tx.commit()?;

        tracing::debug!(entries = entries.len(), "kv entries written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.remove_many(&[key])? > 0)
    }

    fn remove_many(&mut self, keys: &[&str]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM kv_entries WHERE key = ?1")?;
            for key in keys {
                removed += stmt.execute(params![key])?;
            }
        }
        tx.commit()?;

        tracing::debug!(removed, "kv entries removed");
        Ok(removed)
    }
}

/// Map-backed store.  Contents are lost when the value is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }
}
