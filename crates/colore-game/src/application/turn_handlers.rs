//! Turn handlers.
//!
//! Submitting an action is two separate steps. [`begin_turn`] runs
//! synchronously against the store: it appends the action and passes the
//! turn on immediately. The returned [`PendingNarration`] is then resolved
//! against a text generator in the background, and [`deliver_narration`]
//! appends whatever came back. Replies are appended in arrival order, so two
//! quick turns may see their replies land out of order.

use colore_core::generation::TextGenerator;
use tracing::{debug, info, warn};

use crate::application::prompt;
use crate::domain::message::NARRATOR;
use crate::domain::store::{GameStore, SessionEpoch};
use crate::error::TurnError;

/// Narrator line used when a continuation cannot be generated.
pub const FALLBACK_CONTINUATION: &str = "I'm not sure what happens next.";

/// Narrator opening used when the opening scene cannot be generated.
pub const FALLBACK_OPENING: &str = "You find yourself standing at the edge of an enchanted \
forest, where ancient trees whisper secrets in the wind. Mysterious lights dance between the \
branches, and a winding path disappears into the shadows ahead. The air hums with magical \
energy, and you sense that great adventures await. What do you choose to do first?";

/// What kind of narration was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationKind {
    /// The opening scene of a story.
    Opening,
    /// A reply to a player action.
    Continuation,
}

impl NarrationKind {
    fn fallback(self) -> &'static str {
        match self {
            Self::Opening => FALLBACK_OPENING,
            Self::Continuation => FALLBACK_CONTINUATION,
        }
    }
}

/// A narration request captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNarration {
    epoch: SessionEpoch,
    kind: NarrationKind,
    prompt: String,
}

impl PendingNarration {
    /// The prompt that will be sent to the generator.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The kind of narration requested.
    #[must_use]
    pub fn kind(&self) -> NarrationKind {
        self.kind
    }

    /// Calls the generator. Failures and blank replies are replaced by the
    /// fixed fallback line for this kind of request; this never fails.
    pub async fn resolve(self, generator: &dyn TextGenerator) -> NarrationReply {
        let (text, fallback) = match generator.generate(&self.prompt).await {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_owned(), false),
            Ok(_) => {
                warn!(kind = ?self.kind, "narrator returned an empty reply, using fallback");
                (self.kind.fallback().to_owned(), true)
            }
            Err(error) => {
                warn!(%error, kind = ?self.kind, "narration failed, using fallback");
                (self.kind.fallback().to_owned(), true)
            }
        };
        NarrationReply {
            epoch: self.epoch,
            text,
            fallback,
        }
    }
}

/// A resolved narration waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationReply {
    epoch: SessionEpoch,
    text: String,
    fallback: bool,
}

impl NarrationReply {
    /// The narrator text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the fallback line was substituted.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Records the current player's action and passes the turn on.
///
/// # Errors
///
/// Returns `TurnError::NotStarted` before `start_game`, `TurnError::NoPlayers`
/// without players, and `TurnError::EmptyAction` for a blank action. The store
/// is untouched in every error case.
pub fn begin_turn(store: &mut GameStore, action: &str) -> Result<PendingNarration, TurnError> {
    if !store.is_started() {
        return Err(TurnError::NotStarted);
    }
    let Some(player) = store.current_player() else {
        return Err(TurnError::NoPlayers);
    };
    if action.trim().is_empty() {
        return Err(TurnError::EmptyAction);
    }

    let name = player.name.clone();
    store.add_story_message(&name, action);
    store.next_turn();
    store.begin_generating();
    info!(player = %name, next_turn = store.current_turn(), "action submitted");

    Ok(PendingNarration {
        epoch: store.epoch(),
        kind: NarrationKind::Continuation,
        prompt: prompt::continuation_prompt(store.setup(), store.story_log()),
    })
}

/// Requests the opening scene for the recorded setup, optionally weaving in
/// the first player's action. The turn does not move.
pub fn begin_opening(store: &mut GameStore, first_action: Option<&str>) -> PendingNarration {
    store.begin_generating();
    PendingNarration {
        epoch: store.epoch(),
        kind: NarrationKind::Opening,
        prompt: prompt::opening_prompt(store.setup(), first_action),
    }
}

/// Appends a narrator reply to the story log. Replies requested before the
/// last reset are dropped without touching the in-flight count, which the
/// reset already cleared. Returns whether the reply was appended.
pub fn deliver_narration(store: &mut GameStore, reply: &NarrationReply) -> bool {
    if reply.epoch != store.epoch() {
        debug!("dropping narration requested before the last reset");
        return false;
    }
    store.add_story_message(NARRATOR, &reply.text);
    store.finish_generating();
    true
}
