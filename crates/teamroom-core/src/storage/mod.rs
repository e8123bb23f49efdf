mod config;
pub mod database;
pub mod memory;

pub use config::{Config, DisplayConfig, PokerConfig, RetroConfig, ShareConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// Flat string key-value store, the stand-in for browser local storage.
///
/// Keys are compared byte-wise. Implementations are single-writer; the last
/// `set` on a key wins.
pub trait KeyValueStore {
    /// Get a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, in ascending order.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }
}

/// Returns `~/.config/teamroom[-dev]/` based on TEAMROOM_ENV.
///
/// Set TEAMROOM_ENV=dev to use the development data directory, or
/// TEAMROOM_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TEAMROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TEAMROOM_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("teamroom-dev")
            } else {
                base_dir.join("teamroom")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDirUnavailable {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
