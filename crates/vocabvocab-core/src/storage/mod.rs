mod config;
pub mod database;
pub mod memory;

pub use config::{Config, ExamplesConfig, SchedulingConfig, VocabularyConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, StorageError};

/// Fixed key names under which the scheduler state is persisted.
pub mod keys {
    pub const WORDS_VIEWED: &str = "words_viewed";
    pub const SCHEDULED_WORDS: &str = "scheduled_words";
    pub const LEARNED_WORDS: &str = "learned_words";
    pub const TOTAL_VIEWS: &str = "total_views";
    pub const DAILY_COUNT: &str = "daily_count";
    pub const STREAK: &str = "streak";
    pub const DAILY_TARGET: &str = "daily_target";
    pub const TARGET_REACHED: &str = "target_reached";
    pub const CURRENT_WORD: &str = "current_word";
}

/// Opaque key/value persistence.
///
/// Values are JSON text; the store never interprets them.
pub trait KvStore {
    /// Get a value, `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Write several values as one unit.
    ///
    /// The default writes them one by one and stops at the first failure;
    /// backends that can commit atomically should override it.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        (**self).set_many(entries)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `VOCABVOCAB_DATA_DIR` wins when set. Otherwise `~/.config/vocabvocab[-dev]/`
/// based on `VOCABVOCAB_ENV` (set it to `dev` for a development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("VOCABVOCAB_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("VOCABVOCAB_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("vocabvocab-dev")
            } else {
                base_dir.join("vocabvocab")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
