//! Theme preference: resolved once at startup, persisted on every toggle.

use colore_core::storage::{Storage, THEME_KEY};
use tracing::warn;

/// The two persisted theme values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Dark colours.
    Dark,
    /// Light colours.
    Light,
}

impl Theme {
    /// Maps the dark-mode flag to a theme.
    #[must_use]
    pub fn from_dark_mode(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    /// Parses a stored value. Anything but `"dark"` / `"light"` is `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// The stored representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Whether this is the dark theme.
    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Resolves the startup theme. A stored preference wins; otherwise the
/// system preference is used and written back. Storage failures fall back to
/// the system preference without persisting.
pub fn resolve_initial_theme(storage: &dyn Storage, system_prefers_dark: bool) -> Theme {
    let system = Theme::from_dark_mode(system_prefers_dark);
    match storage.get(THEME_KEY) {
        Ok(stored) => {
            if let Some(theme) = stored.as_deref().and_then(Theme::parse) {
                return theme;
            }
            persist_theme(storage, system);
            system
        }
        Err(error) => {
            warn!(%error, "failed to read theme preference, using system preference");
            system
        }
    }
}

/// Persists `theme`, logging and swallowing failures.
pub fn persist_theme(storage: &dyn Storage, theme: Theme) {
    if let Err(error) = storage.set(THEME_KEY, theme.as_str()) {
        warn!(%error, theme = theme.as_str(), "failed to save theme preference");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colore_test_support::{FailingStorage, MemoryStorage};

    #[test]
    fn test_stored_preference_wins_over_system() {
        let storage = MemoryStorage::with_value(THEME_KEY, "light");

        let theme = resolve_initial_theme(&storage, true);

        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_missing_preference_uses_system_and_persists_it() {
        let storage = MemoryStorage::new();

        let theme = resolve_initial_theme(&storage, true);

        assert_eq!(theme, Theme::Dark);
        assert_eq!(storage.value(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_unrecognised_preference_is_replaced_by_system() {
        let storage = MemoryStorage::with_value(THEME_KEY, "system");

        let theme = resolve_initial_theme(&storage, false);

        assert_eq!(theme, Theme::Light);
        assert_eq!(storage.value(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_unreadable_storage_falls_back_to_system() {
        let theme = resolve_initial_theme(&FailingStorage, true);

        assert_eq!(theme, Theme::Dark);
    }
}
