//! Speech-synthesis provider abstraction.
//!
//! A synthesizer is a single global resource: at most one utterance may be
//! active at a time. Lifecycle notifications are delivered asynchronously as
//! [`SpeechEvent`]s over the channel handed to [`SpeechSynthesizer::speak`].

use std::fmt;

use tokio::sync::mpsc;

/// Identifies one utterance so late lifecycle events can be told apart from
/// events of the utterance currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance-{}", self.0)
    }
}

/// Voice parameters for a single utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    /// Speaking rate, 1.0 is normal speed.
    pub rate: f32,
    /// Voice pitch, 1.0 is normal pitch.
    pub pitch: f32,
    /// Volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// Provider-specific voice name; `None` uses the provider default.
    pub voice: Option<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            rate: 0.9,
            pitch: 1.0,
            volume: 0.8,
            voice: None,
        }
    }
}

/// A request to speak some text.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// Identifier echoed back on every lifecycle event.
    pub id: UtteranceId,
    /// The text to speak.
    pub text: String,
    /// Voice parameters.
    pub options: SpeechOptions,
}

/// Lifecycle notification kinds reported by a synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEventKind {
    /// Audio started playing.
    Start,
    /// Playback finished naturally.
    End,
    /// Playback failed or was interrupted.
    Error(String),
    /// Playback was paused.
    Pause,
    /// Playback resumed after a pause.
    Resume,
}

/// A lifecycle notification for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEvent {
    /// The utterance this event belongs to.
    pub utterance_id: UtteranceId,
    /// What happened.
    pub kind: SpeechEventKind,
}

impl SpeechEvent {
    /// Creates an event for `utterance_id`.
    #[must_use]
    pub fn new(utterance_id: UtteranceId, kind: SpeechEventKind) -> Self {
        Self { utterance_id, kind }
    }
}

/// Sending half of the lifecycle event channel.
pub type SpeechEventSender = mpsc::UnboundedSender<SpeechEvent>;

/// Receiving half of the lifecycle event channel.
pub type SpeechEventReceiver = mpsc::UnboundedReceiver<SpeechEvent>;

/// Creates a lifecycle event channel.
#[must_use]
pub fn speech_event_channel() -> (SpeechEventSender, SpeechEventReceiver) {
    mpsc::unbounded_channel()
}

/// Text-to-speech backend.
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether speech is available in this environment at all.
    fn is_supported(&self) -> bool;

    /// Starts speaking `utterance`. Lifecycle events for it are sent on
    /// `events`; send failures (receiver gone) are ignored.
    fn speak(&self, utterance: Utterance, events: SpeechEventSender);

    /// Cancels the active utterance, if any. Safe to call when idle.
    fn cancel(&self);

    /// Pauses the active utterance.
    fn pause(&self);

    /// Resumes a paused utterance.
    fn resume(&self);

    /// Whether an utterance is currently active (playing or paused).
    fn is_speaking(&self) -> bool;

    /// Whether the active utterance is paused.
    fn is_paused(&self) -> bool;

    /// Names of the voices this backend offers.
    fn voices(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_speech_options_match_narrator_voice() {
        let options = SpeechOptions::default();

        assert!((options.rate - 0.9).abs() < f32::EPSILON);
        assert!((options.pitch - 1.0).abs() < f32::EPSILON);
        assert!((options.volume - 0.8).abs() < f32::EPSILON);
        assert!(options.voice.is_none());
    }

    #[test]
    fn test_event_channel_delivers_in_order() {
        let (tx, mut rx) = speech_event_channel();
        let id = UtteranceId(7);

        tx.send(SpeechEvent::new(id, SpeechEventKind::Start)).unwrap();
        tx.send(SpeechEvent::new(id, SpeechEventKind::End)).unwrap();

        assert_eq!(rx.try_recv().unwrap().kind, SpeechEventKind::Start);
        assert_eq!(rx.try_recv().unwrap().kind, SpeechEventKind::End);
    }
}
