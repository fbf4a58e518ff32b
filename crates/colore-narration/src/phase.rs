//! Per-utterance playback state machine.

use colore_core::speech::SpeechEventKind;

/// Playback state of the current utterance.
///
/// `Idle -> Speaking -> Idle` on completion, `Speaking -> Idle` on error or
/// stop, `Speaking <-> Paused` on pause and resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrationPhase {
    /// Nothing is playing.
    #[default]
    Idle,
    /// Audio is playing.
    Speaking,
    /// Playback is paused mid-utterance.
    Paused,
}

impl NarrationPhase {
    /// Applies a lifecycle event. Events that make no sense in the current
    /// phase leave it unchanged.
    #[must_use]
    pub fn on_event(self, kind: &SpeechEventKind) -> Self {
        match (self, kind) {
            (Self::Idle, SpeechEventKind::Start) | (Self::Paused, SpeechEventKind::Resume) => {
                Self::Speaking
            }
            (Self::Speaking, SpeechEventKind::Pause) => Self::Paused,
            (_, SpeechEventKind::End | SpeechEventKind::Error(_)) => Self::Idle,
            (phase, _) => phase,
        }
    }

    /// Whether audio is audible right now.
    #[must_use]
    pub fn is_speaking(self) -> bool {
        self == Self::Speaking
    }
}
