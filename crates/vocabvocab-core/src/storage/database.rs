//! SQLite-backed key/value store.
//!
//! Holds every piece of learner state as a JSON string in a single `kv`
//! table, one row per persisted key.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{data_dir, KvStore};
use crate::error::{CoreError, StorageError};

/// SQLite database for learner state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/vocabvocab.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("vocabvocab.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
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
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(self.kv_set(key, value)?)
    }

    /// All-or-nothing: the values are written inside one transaction.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)")?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
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
    }

    #[test]
    fn set_replaces_existing_value() {
        let db = Database::open_memory().unwrap();
        db.set("total_views", "1").unwrap();
        db.set("total_views", "2").unwrap();
        assert_eq!(db.get("total_views").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn set_many_writes_every_value() {
        let db = Database::open_memory().unwrap();
        db.set_many(&[("total_views", "3".into()), ("learned_words", "[]".into())])
            .unwrap();
        assert_eq!(db.get("total_views").unwrap().as_deref(), Some("3"));
        assert_eq!(db.get("learned_words").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn failed_set_many_leaves_earlier_values_untouched() {
        let db = Database::open_memory().unwrap();
        db.set("words_viewed", r#"["a"]"#).unwrap();
        db.conn
            .execute_batch(
                "CREATE TRIGGER refuse_total BEFORE INSERT ON kv
                 WHEN NEW.key = 'total_views'
                 BEGIN SELECT RAISE(ABORT, 'refused'); END;",
            )
            .unwrap();

        let result = db.set_many(&[
            ("words_viewed", r#"["a","b"]"#.into()),
            ("total_views", "2".into()),
        ]);
        assert!(result.is_err());
        assert_eq!(db.get("words_viewed").unwrap().as_deref(), Some(r#"["a"]"#));
        assert!(db.get("total_views").unwrap().is_none());
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabvocab.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("learned_words", r#"["chat"]"#).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(
            db.get("learned_words").unwrap().as_deref(),
            Some(r#"["chat"]"#)
        );
    }
}
