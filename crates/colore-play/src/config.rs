//! Front-end configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use colore_game::narrator::ollama::{DEFAULT_OLLAMA_BASE_URL, DEFAULT_OLLAMA_MODEL};
use colore_narration::DEFAULT_NARRATION_DELAY;

use crate::speech::SPEECH_COMMAND_VAR;
use crate::storage::FileStorage;

/// Settings for one terminal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayConfig {
    /// Ollama server URL.
    pub ollama_base_url: String,
    /// Ollama model name.
    pub ollama_model: String,
    /// Where preferences are stored.
    pub state_dir: PathBuf,
    /// Speech command line; `None` disables speech.
    pub speech_command: Option<String>,
    /// Theme to use when no preference has been stored.
    pub system_prefers_dark: bool,
    /// Use the canned narrator instead of Ollama.
    pub offline: bool,
    /// Pause before a new narrator message is spoken.
    pub narration_delay: Duration,
}

impl PlayConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, applying defaults for
    /// anything unset or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            ollama_base_url: var("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_owned()),
            ollama_model: var("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_owned()),
            state_dir: var("COLORE_STATE_DIR").map_or_else(FileStorage::default_dir, PathBuf::from),
            speech_command: var(SPEECH_COMMAND_VAR),
            system_prefers_dark: var("COLORE_SYSTEM_THEME")
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("dark")),
            offline: var("COLORE_OFFLINE").is_some_and(|v| {
                !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no")
            }),
            narration_delay: DEFAULT_NARRATION_DELAY,
        }
    }
}
