//! Supported target languages and the remembered last choice.

use colore_core::storage::{LAST_TRANSLATE_LANGUAGE_KEY, Storage};
use tracing::warn;

/// Language preselected when nothing has been remembered.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A target language offered to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Two-letter code sent to providers.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
}

/// Every language players can translate into.
pub const LANGUAGES: [Language; 20] = [
    Language { code: "en", name: "English" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "it", name: "Italian" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ru", name: "Russian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "zh", name: "Chinese" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "th", name: "Thai" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "da", name: "Danish" },
    Language { code: "no", name: "Norwegian" },
    Language { code: "fi", name: "Finnish" },
];

/// Codes of every supported language, in catalogue order.
#[must_use]
pub fn supported_codes() -> Vec<&'static str> {
    LANGUAGES.iter().map(|l| l.code).collect()
}

/// Looks up a language by code, case-insensitively.
#[must_use]
pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code.trim()))
}

/// The language chosen last time, or [`DEFAULT_LANGUAGE`] when nothing usable
/// was stored or storage is unavailable.
#[must_use]
pub fn load_last_language(storage: &dyn Storage) -> &'static str {
    match storage.get(LAST_TRANSLATE_LANGUAGE_KEY) {
        Ok(stored) => stored
            .as_deref()
            .and_then(find_language)
            .map_or(DEFAULT_LANGUAGE, |l| l.code),
        Err(error) => {
            warn!(%error, "could not read last translation language");
            DEFAULT_LANGUAGE
        }
    }
}

/// Remembers `code` for next time. Storage failures are logged and ignored.
pub fn save_last_language(storage: &dyn Storage, code: &str) {
    if let Err(error) = storage.set(LAST_TRANSLATE_LANGUAGE_KEY, code) {
        warn!(%error, code, "could not save last translation language");
    }
}
