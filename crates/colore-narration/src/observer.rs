//! Watches the story log for new narrator messages.

use colore_game::domain::message::Message;
use colore_game::domain::store::{GameStore, SessionEpoch};

/// Remembers how much of the story log has been seen.
#[derive(Debug, Default)]
pub struct StoryObserver {
    seen: usize,
    epoch: SessionEpoch,
}

impl StoryObserver {
    /// Creates an observer that has seen nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observer that treats everything already in `store` as seen.
    #[must_use]
    pub fn caught_up(store: &GameStore) -> Self {
        Self {
            seen: store.story_log().len(),
            epoch: store.epoch(),
        }
    }

    /// Looks at the messages appended since the last call and returns the
    /// latest narrator message among them. Earlier narrator messages in the
    /// same batch are skipped. A reset starts the count over.
    pub fn observe<'a>(&mut self, store: &'a GameStore) -> Option<&'a Message> {
        let log = store.story_log();
        if store.epoch() != self.epoch || log.len() < self.seen {
            self.epoch = store.epoch();
            self.seen = 0;
        }
        let fresh = &log[self.seen..];
        self.seen = log.len();
        fresh.iter().rev().find(|m| m.is_from_narrator())
    }
}
