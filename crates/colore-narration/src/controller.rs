//! Narration controller.
//!
//! Owns the single speech channel. Every utterance gets a fresh
//! [`UtteranceId`]; lifecycle events that do not belong to the current
//! utterance are dropped, so a late `End` from a cancelled utterance can never
//! clear the speaking flag of the one that replaced it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use colore_core::speech::{
    SpeechEvent, SpeechEventKind, SpeechEventReceiver, SpeechEventSender, SpeechOptions,
    SpeechSynthesizer, Utterance, UtteranceId, speech_event_channel,
};
use colore_game::domain::store::GameStore;
use tracing::{debug, info, warn};

use crate::observer::StoryObserver;
use crate::phase::NarrationPhase;
use crate::typing::TypingGuard;

/// Pause between a narrator message landing and it being spoken.
pub const DEFAULT_NARRATION_DELAY: Duration = Duration::from_millis(100);

/// Drives speech synthesis from store state and mirrors playback back into
/// the store's speaking flag.
pub struct NarrationController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    options: SpeechOptions,
    events_tx: SpeechEventSender,
    events_rx: SpeechEventReceiver,
    current: Option<UtteranceId>,
    next_id: u64,
    phase: NarrationPhase,
    observer: StoryObserver,
}

impl fmt::Debug for NarrationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrationController")
            .field("supported", &self.synthesizer.is_supported())
            .field("options", &self.options)
            .field("current", &self.current)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl NarrationController {
    /// Creates a controller speaking through `synthesizer` with the default
    /// narrator voice.
    #[must_use]
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        let (events_tx, events_rx) = speech_event_channel();
        Self {
            synthesizer,
            options: SpeechOptions::default(),
            events_tx,
            events_rx,
            current: None,
            next_id: 1,
            phase: NarrationPhase::Idle,
            observer: StoryObserver::new(),
        }
    }

    /// Replaces the voice parameters used by [`speak`](Self::speak).
    #[must_use]
    pub fn with_options(mut self, options: SpeechOptions) -> Self {
        self.options = options;
        self
    }

    /// Voice parameters used by [`speak`](Self::speak).
    #[must_use]
    pub fn options(&self) -> &SpeechOptions {
        &self.options
    }

    /// Whether the backend can speak at all.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    /// Playback state of the current utterance.
    #[must_use]
    pub fn phase(&self) -> NarrationPhase {
        self.phase
    }

    /// The utterance whose events are currently honoured.
    #[must_use]
    pub fn current(&self) -> Option<UtteranceId> {
        self.current
    }

    /// Voices offered by the backend; empty when speech is unsupported.
    #[must_use]
    pub fn voices(&self) -> Vec<String> {
        if self.synthesizer.is_supported() {
            self.synthesizer.voices()
        } else {
            Vec::new()
        }
    }

    /// Speaks `text` with the controller's voice parameters.
    pub fn speak(&mut self, store: &mut GameStore, text: &str) -> Option<UtteranceId> {
        let options = self.options.clone();
        self.speak_with(store, text, options)
    }

    /// Speaks `text`, replacing whatever is playing.
    ///
    /// Does nothing when speech is unsupported, narration is switched off, or
    /// the text is blank. Returns the id of the new utterance otherwise.
    pub fn speak_with(
        &mut self,
        store: &mut GameStore,
        text: &str,
        options: SpeechOptions,
    ) -> Option<UtteranceId> {
        if !self.synthesizer.is_supported() || !store.narrate_enabled() {
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.synthesizer.cancel();
        self.phase = NarrationPhase::Idle;
        store.set_speaking(false);

        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        self.current = Some(id);
        self.synthesizer.speak(
            Utterance {
                id,
                text: text.to_owned(),
                options,
            },
            self.events_tx.clone(),
        );
        info!(utterance = %id, chars = text.chars().count(), "narrating");
        Some(id)
    }

    /// Silences narration. Safe to call when nothing is playing.
    pub fn stop(&mut self, store: &mut GameStore) {
        self.synthesizer.cancel();
        if let Some(id) = self.current.take() {
            debug!(utterance = %id, "narration stopped");
        }
        self.phase = NarrationPhase::Idle;
        store.set_speaking(false);
    }

    /// Pauses playback if an utterance is playing. Returns whether the
    /// request was passed on.
    pub fn pause(&self) -> bool {
        if self.synthesizer.is_speaking() && !self.synthesizer.is_paused() {
            self.synthesizer.pause();
            return true;
        }
        false
    }

    /// Resumes playback if an utterance is paused. Returns whether the
    /// request was passed on.
    pub fn resume(&self) -> bool {
        if self.synthesizer.is_paused() {
            self.synthesizer.resume();
            return true;
        }
        false
    }

    /// Applies every lifecycle event received so far. Returns how many were
    /// applied to the current utterance.
    pub fn pump_events(&mut self, store: &mut GameStore) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply_event(store, event) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next lifecycle event. Pair with
    /// [`apply_event`](Self::apply_event) in a select loop.
    pub async fn recv_event(&mut self) -> Option<SpeechEvent> {
        self.events_rx.recv().await
    }

    /// Applies one lifecycle event. Events for any utterance other than the
    /// current one are ignored; returns whether the event was applied.
    pub fn apply_event(&mut self, store: &mut GameStore, event: SpeechEvent) -> bool {
        if self.current != Some(event.utterance_id) {
            debug!(utterance = %event.utterance_id, kind = ?event.kind, "ignoring stale speech event");
            return false;
        }

        if let SpeechEventKind::Error(reason) = &event.kind {
            warn!(utterance = %event.utterance_id, %reason, "speech ended with an error");
        }
        self.phase = self.phase.on_event(&event.kind);
        store.set_speaking(self.phase.is_speaking());
        if matches!(event.kind, SpeechEventKind::End | SpeechEventKind::Error(_)) {
            self.current = None;
        }
        true
    }

    /// Returns the latest narrator message appended since the last call, if
    /// any. The caller waits [`DEFAULT_NARRATION_DELAY`] before speaking it.
    pub fn observe_story(&mut self, store: &GameStore) -> Option<String> {
        self.observer.observe(store).map(|m| m.content.clone())
    }

    /// Skips everything already in the story log.
    pub fn catch_up(&mut self, store: &GameStore) {
        self.observer = StoryObserver::caught_up(store);
    }

    /// Feeds an input field's new value. Stops narration when a typing session
    /// starts; returns whether it did.
    pub fn interrupt_for_typing(
        &mut self,
        store: &mut GameStore,
        guard: &mut TypingGuard,
        value: &str,
    ) -> bool {
        if guard.on_input(value) {
            self.stop(store);
            return true;
        }
        false
    }

    /// Stops speech if narration has been switched off while speaking.
    pub fn sync_narrate_enabled(&mut self, store: &mut GameStore) {
        if !store.narrate_enabled() && (store.is_speaking() || self.current.is_some()) {
            self.stop(store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colore_game::domain::message::NARRATOR;
    use colore_test_support::{FakeSynthesizer, FixedClock, MemoryStorage};

    fn store() -> GameStore {
        GameStore::new(
            Arc::new(FixedClock::standard()),
            Arc::new(MemoryStorage::new()),
            false,
        )
    }

    fn controller() -> (NarrationController, Arc<FakeSynthesizer>) {
        let synth = Arc::new(FakeSynthesizer::new());
        (NarrationController::new(synth.clone()), synth)
    }

    #[test]
    fn test_stop_when_idle_is_harmless() {
        // Arrange
        let mut store = store();
        let (mut controller, _synth) = controller();

        // Act
        controller.stop(&mut store);
        controller.stop(&mut store);

        // Assert
        assert!(!store.is_speaking());
        assert_eq!(controller.phase(), NarrationPhase::Idle);
    }

    #[test]
    fn test_lifecycle_events_drive_speaking_flag() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();
        controller.speak(&mut store, "The gate creaks open.");

        // Act / Assert: start
        synth.emit(SpeechEventKind::Start);
        assert_eq!(controller.pump_events(&mut store), 1);
        assert!(store.is_speaking());

        // Act / Assert: natural end
        synth.emit(SpeechEventKind::End);
        controller.pump_events(&mut store);
        assert!(!store.is_speaking());
        assert!(controller.current().is_none());
    }

    #[test]
    fn test_speak_uses_narrator_voice() {
        let mut store = store();
        let (mut controller, synth) = controller();

        controller.speak(&mut store, "  Hello there.  ");

        let spoken = synth.spoken();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "Hello there.");
        assert_eq!(spoken[0].options, SpeechOptions::default());
    }

    #[test]
    fn test_speak_is_noop_when_unsupported() {
        let mut store = store();
        let synth = Arc::new(FakeSynthesizer::unsupported());
        let mut controller = NarrationController::new(synth.clone());

        assert!(controller.speak(&mut store, "hello").is_none());
        assert!(synth.spoken().is_empty());
        assert!(controller.voices().is_empty());
    }

    #[test]
    fn test_speak_is_noop_when_narration_disabled() {
        let mut store = store();
        store.toggle_narrate();
        let (mut controller, synth) = controller();

        assert!(controller.speak(&mut store, "hello").is_none());
        assert!(synth.spoken().is_empty());
    }

    #[test]
    fn test_speak_is_noop_for_blank_text() {
        let mut store = store();
        let (mut controller, synth) = controller();

        assert!(controller.speak(&mut store, " \n\t").is_none());
        assert!(synth.spoken().is_empty());
        assert_eq!(synth.cancel_count(), 0);
    }

    #[test]
    fn test_new_utterance_replaces_the_playing_one() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();
        let first = controller.speak(&mut store, "first").unwrap();
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        // Act
        let second = controller.speak(&mut store, "second").unwrap();

        // Assert: the cancelled utterance's error is ignored
        assert_eq!(synth.cancel_count(), 2);
        assert_eq!(controller.pump_events(&mut store), 0);
        assert_ne!(first, second);
        assert_eq!(synth.active(), Some(second));
        assert_eq!(controller.current(), Some(second));
        assert!(!store.is_speaking());

        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);
        assert!(store.is_speaking());
    }

    #[test]
    fn test_late_end_from_stopped_utterance_is_ignored() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();
        let old = controller.speak(&mut store, "old").unwrap();
        controller.stop(&mut store);
        controller.speak(&mut store, "new").unwrap();
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        // Act
        synth.emit_for(old, SpeechEventKind::End);
        let applied = controller.pump_events(&mut store);

        // Assert
        assert_eq!(applied, 0);
        assert!(store.is_speaking());
    }

    #[test]
    fn test_stop_during_speech_clears_flag() {
        let mut store = store();
        let (mut controller, synth) = controller();
        controller.speak(&mut store, "long tale");
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        controller.stop(&mut store);
        controller.pump_events(&mut store);

        assert!(!store.is_speaking());
        assert!(synth.active().is_none());
    }

    #[test]
    fn test_pause_and_resume_only_delegate_when_meaningful() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();

        // Act / Assert: nothing playing
        assert!(!controller.pause());
        assert!(!controller.resume());

        controller.speak(&mut store, "a song of wind");
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        // Act / Assert: pause
        assert!(controller.pause());
        assert!(!controller.pause());
        controller.pump_events(&mut store);
        assert!(!store.is_speaking());
        assert_eq!(controller.phase(), NarrationPhase::Paused);

        // Act / Assert: resume
        assert!(controller.resume());
        controller.pump_events(&mut store);
        assert!(store.is_speaking());
    }

    #[test]
    fn test_typing_interrupts_once_per_session() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();
        let mut guard = TypingGuard::new();
        controller.speak(&mut store, "narration");
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        // Act
        let first = controller.interrupt_for_typing(&mut store, &mut guard, "h");
        let second = controller.interrupt_for_typing(&mut store, &mut guard, "he");

        // Assert
        assert!(first);
        assert!(!second);
        assert!(!store.is_speaking());
        assert_eq!(synth.cancel_count(), 2);
    }

    #[test]
    fn test_disabling_narration_stops_speech() {
        let mut store = store();
        let (mut controller, synth) = controller();
        controller.speak(&mut store, "narration");
        synth.emit(SpeechEventKind::Start);
        controller.pump_events(&mut store);

        store.toggle_narrate();
        controller.sync_narrate_enabled(&mut store);

        assert!(!store.is_speaking());
        assert!(synth.active().is_none());
    }

    #[test]
    fn test_observe_story_reports_new_narrator_message_once() {
        let mut store = store();
        let (mut controller, _synth) = controller();
        store.add_story_message("Alice", "knock");
        store.add_story_message(NARRATOR, "Someone answers.");

        assert_eq!(
            controller.observe_story(&store).as_deref(),
            Some("Someone answers.")
        );
        assert!(controller.observe_story(&store).is_none());
    }

    #[test]
    fn test_catch_up_skips_existing_messages() {
        let mut store = store();
        let (mut controller, _synth) = controller();
        store.add_story_message(NARRATOR, "Earlier.");

        controller.catch_up(&store);

        assert!(controller.observe_story(&store).is_none());
    }

    #[test]
    fn test_voices_come_from_backend() {
        let (controller, _synth) = controller();

        assert_eq!(controller.voices(), ["Narrator", "Bard"]);
    }

    #[tokio::test]
    async fn test_recv_event_waits_for_lifecycle_event() {
        // Arrange
        let mut store = store();
        let (mut controller, synth) = controller();
        controller.speak(&mut store, "hello");
        synth.emit(SpeechEventKind::Start);

        // Act
        let event = controller.recv_event().await.unwrap();
        let applied = controller.apply_event(&mut store, event);

        // Assert
        assert!(applied);
        assert!(store.is_speaking());
    }
}
