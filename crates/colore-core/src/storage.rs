//! Key-value preference storage abstraction.
//!
//! Only user preferences live here (theme, last translation language);
//! game state is never persisted.

use crate::error::StorageError;

/// Storage key for the theme preference (`"dark"` or `"light"`).
pub const THEME_KEY: &str = "theme";

/// Storage key for the last language chosen for translation.
pub const LAST_TRANSLATE_LANGUAGE_KEY: &str = "lastTranslateLanguage";

/// Best-effort string key-value store.
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
