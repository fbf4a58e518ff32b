//! Story setup: a genre or a custom backstory chosen before the first beat.

use serde::{Deserialize, Serialize};

/// Title used for custom stories when no explicit title is given.
pub const DEFAULT_CUSTOM_TITLE: &str = "Custom Adventure";

/// Longest custom backstory accepted, in characters.
pub const MAX_BACKSTORY_CHARS: usize = 1000;

/// Longest custom story title accepted, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// How the story is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupMode {
    /// Pick one of the catalogue genres.
    Genre,
    /// Free-form backstory written by the players.
    Custom,
}

/// The recorded setup selection. Exactly one of genre or backstory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSetup {
    /// A genre name, e.g. `"Fantasy"`.
    Genre(String),
    /// A custom backstory.
    Custom(String),
}

/// A catalogue entry shown while choosing a genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name, also used as the story title.
    pub name: &'static str,
    /// One-line pitch.
    pub description: &'static str,
}

/// The genres offered at setup.
pub const GENRES: [Genre; 10] = [
    Genre {
        id: "fantasy",
        name: "Fantasy",
        description: "Magic, mythical creatures, and epic quests",
    },
    Genre {
        id: "sci-fi",
        name: "Sci-Fi",
        description: "Space exploration, advanced technology, and futuristic worlds",
    },
    Genre {
        id: "mystery",
        name: "Mystery",
        description: "Puzzles, secrets, and detective work",
    },
    Genre {
        id: "slice-of-life",
        name: "Slice of Life",
        description: "Everyday moments and realistic situations",
    },
    Genre {
        id: "crime",
        name: "Crime",
        description: "Heists, investigations, and criminal underworld",
    },
    Genre {
        id: "thriller",
        name: "Thriller",
        description: "Suspense, danger, and edge-of-your-seat action",
    },
    Genre {
        id: "romance",
        name: "Romance",
        description: "Love stories and emotional connections",
    },
    Genre {
        id: "historical",
        name: "Historical",
        description: "Past eras, historical events, and period settings",
    },
    Genre {
        id: "post-apocalyptic",
        name: "Post-Apocalyptic",
        description: "Survival in a world after catastrophe",
    },
    Genre {
        id: "surreal",
        name: "Surreal",
        description: "Dream-like, bizarre, and unconventional narratives",
    },
];

/// Looks a genre up by id or display name, ignoring case.
#[must_use]
pub fn find_genre(key: &str) -> Option<&'static Genre> {
    let key = key.trim();
    GENRES
        .iter()
        .find(|g| g.id.eq_ignore_ascii_case(key) || g.name.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_genre_matches_id_and_name() {
        assert_eq!(find_genre("sci-fi").map(|g| g.name), Some("Sci-Fi"));
        assert_eq!(find_genre(" slice of life ").map(|g| g.id), Some("slice-of-life"));
        assert!(find_genre("western").is_none());
    }
}
