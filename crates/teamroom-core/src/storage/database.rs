//! SQLite-backed key-value storage.
//!
//! One `kv` table holds every record the widgets persist: votes, presence
//! lists, the last-used user name and the CLI's current room.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KeyValueStore};
use crate::error::{Result, StorageError};

/// SQLite database holding the key-value namespace.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/teamroom/teamroom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("teamroom.db"))
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Delete a key from the kv store.
    pub fn kv_remove(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// List keys that start with `prefix`.
    ///
    /// Uses `substr` rather than `LIKE` so `%` and `_` in names match literally.
    pub fn kv_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key",
        )?;
        let rows = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.kv_set(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<()> {
        Ok(self.kv_remove(key)?)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self.kv_keys_with_prefix(prefix)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_set("test", "again").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "again");
    }

    #[test]
    fn kv_remove_is_idempotent() {
        let db = Database::open_memory().unwrap();
        db.kv_set("gone", "1").unwrap();
        db.kv_remove("gone").unwrap();
        db.kv_remove("gone").unwrap();
        assert!(db.kv_get("gone").unwrap().is_none());
    }

    #[test]
    fn prefix_scan_is_literal_and_sorted() {
        let db = Database::open_memory().unwrap();
        db.kv_set("room-b", "1").unwrap();
        db.kv_set("room-a", "1").unwrap();
        db.kv_set("room_x", "1").unwrap();
        db.kv_set("other", "1").unwrap();

        assert_eq!(
            db.kv_keys_with_prefix("room-").unwrap(),
            vec!["room-a".to_string(), "room-b".to_string()]
        );
        assert_eq!(db.kv_keys_with_prefix("room_").unwrap(), vec!["room_x".to_string()]);
        assert_eq!(db.kv_keys_with_prefix("").unwrap().len(), 4);
    }

    #[test]
    fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teamroom.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("planning-poker-username", "alice").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(
            db.get("planning-poker-username").unwrap().as_deref(),
            Some("alice")
        );
    }
}
