//! Test synthesizer: a scriptable `SpeechSynthesizer` for tests.
//!
//! Nothing is ever played. Tests drive the lifecycle by calling
//! [`FakeSynthesizer::emit`], which sends an event for the active utterance,
//! the same way a real backend reports progress.

use std::sync::Mutex;

use colore_core::speech::{
    SpeechEvent, SpeechEventKind, SpeechEventSender, SpeechSynthesizer, Utterance, UtteranceId,
};

#[derive(Debug, Default)]
struct FakeState {
    spoken: Vec<Utterance>,
    active: Option<UtteranceId>,
    sender: Option<SpeechEventSender>,
    paused: bool,
    cancels: usize,
}

/// A synthesizer that records utterances and lets tests emit lifecycle events.
#[derive(Debug)]
pub struct FakeSynthesizer {
    supported: bool,
    state: Mutex<FakeState>,
}

impl FakeSynthesizer {
    /// Creates a supported synthesizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            supported: true,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Creates a synthesizer that reports speech as unsupported.
    #[must_use]
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Every utterance passed to `speak`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn spoken(&self) -> Vec<Utterance> {
        self.state.lock().unwrap().spoken.clone()
    }

    /// The text of every utterance passed to `speak`, in order.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|u| u.text).collect()
    }

    /// Number of `cancel` calls received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn cancel_count(&self) -> usize {
        self.state.lock().unwrap().cancels
    }

    /// The utterance currently active, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn active(&self) -> Option<UtteranceId> {
        self.state.lock().unwrap().active
    }

    /// Emits `kind` for the active utterance. `End` and `Error` finish it.
    /// Does nothing when idle.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn emit(&self, kind: SpeechEventKind) {
        let mut state = self.state.lock().unwrap();
        let Some(id) = state.active else {
            return;
        };
        if matches!(kind, SpeechEventKind::End | SpeechEventKind::Error(_)) {
            state.active = None;
            state.paused = false;
        }
        if let Some(sender) = &state.sender {
            let _ = sender.send(SpeechEvent::new(id, kind));
        }
    }

    /// Emits `kind` tagged with an arbitrary utterance id, without touching
    /// the active utterance. Simulates late events from a cancelled utterance.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn emit_for(&self, id: UtteranceId, kind: SpeechEventKind) {
        let state = self.state.lock().unwrap();
        if let Some(sender) = &state.sender {
            let _ = sender.send(SpeechEvent::new(id, kind));
        }
    }
}

impl Default for FakeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn speak(&self, utterance: Utterance, events: SpeechEventSender) {
        let mut state = self.state.lock().unwrap();
        state.active = Some(utterance.id);
        state.paused = false;
        state.sender = Some(events);
        state.spoken.push(utterance);
    }

    fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.cancels += 1;
        state.paused = false;
        if let Some(id) = state.active.take() {
            if let Some(sender) = &state.sender {
                let _ = sender.send(SpeechEvent::new(
                    id,
                    SpeechEventKind::Error("interrupted".into()),
                ));
            }
        }
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if let (Some(id), false) = (state.active, state.paused) {
            state.paused = true;
            if let Some(sender) = &state.sender {
                let _ = sender.send(SpeechEvent::new(id, SpeechEventKind::Pause));
            }
        }
    }

    fn resume(&self) {
        let mut state = self.state.lock().unwrap();
        if let (Some(id), true) = (state.active, state.paused) {
            state.paused = false;
            if let Some(sender) = &state.sender {
                let _ = sender.send(SpeechEvent::new(id, SpeechEventKind::Resume));
            }
        }
    }

    fn is_speaking(&self) -> bool {
        self.state.lock().unwrap().active.is_some()
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn voices(&self) -> Vec<String> {
        vec!["Narrator".to_owned(), "Bard".to_owned()]
    }
}
