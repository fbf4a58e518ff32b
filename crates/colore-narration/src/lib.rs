//! CoLore: narration.
//!
//! Speaks new narrator messages aloud, stops speech when a player starts
//! typing or narration is switched off, and mirrors the speech lifecycle into
//! the store's speaking flag.

pub mod controller;
pub mod observer;
pub mod phase;
pub mod typing;

pub use controller::{DEFAULT_NARRATION_DELAY, NarrationController};
pub use observer::StoryObserver;
pub use phase::NarrationPhase;
pub use typing::TypingGuard;
