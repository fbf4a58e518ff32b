//! The table: one game session and everything wired around it.
//!
//! Owns the store and is its only writer. Narration requests run as spawned
//! tasks and come back through [`Table::next_event`] alongside speech
//! lifecycle events, so the input loop never waits on the narrator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use colore_core::generation::TextGenerator;
use colore_core::speech::SpeechEvent;
use colore_core::storage::Storage;
use colore_game::application::turn_handlers::{
    NarrationReply, PendingNarration, begin_opening, begin_turn, deliver_narration,
};
use colore_game::domain::message::NARRATOR;
use colore_game::domain::setup::{SetupMode, find_genre};
use colore_game::domain::store::{GameStore, MIN_PLAYERS, NarrateToggle};
use colore_narration::{DEFAULT_NARRATION_DELAY, NarrationController, TypingGuard};
use colore_translation::application::fallback::FallbackTranslator;
use colore_translation::domain::language::{load_last_language, save_last_language};
use colore_translation::domain::request::TranslationRequest;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::command::Command;
use crate::error::PlayError;
use crate::render;

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing to show.
    Silent,
    /// Show this text.
    Info(String),
    /// End the session.
    Quit,
}

/// Something that happened in the background.
#[derive(Debug)]
pub enum TableEvent {
    /// A narrator reply is ready to be appended.
    Narration(NarrationReply),
    /// The speech backend reported progress.
    Speech(SpeechEvent),
    /// Both background channels are closed.
    Closed,
}

/// Which input field a line was typed into.
#[derive(Debug, Clone, Copy)]
enum Input {
    Story,
    Chat,
}

/// One game session.
pub struct Table {
    store: GameStore,
    narration: NarrationController,
    generator: Arc<dyn TextGenerator>,
    translator: Arc<FallbackTranslator>,
    storage: Arc<dyn Storage>,
    story_input: TypingGuard,
    chat_input: TypingGuard,
    narration_delay: Duration,
    replies_tx: mpsc::UnboundedSender<NarrationReply>,
    replies_rx: mpsc::UnboundedReceiver<NarrationReply>,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("store", &self.store)
            .field("narration", &self.narration)
            .field("translator", &self.translator)
            .field("narration_delay", &self.narration_delay)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Wires a session together. `storage` is used for the remembered
    /// translation language and should be the store's own storage.
    #[must_use]
    pub fn new(
        store: GameStore,
        mut narration: NarrationController,
        generator: Arc<dyn TextGenerator>,
        translator: Arc<FallbackTranslator>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        narration.catch_up(&store);
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            store,
            narration,
            generator,
            translator,
            storage,
            story_input: TypingGuard::new(),
            chat_input: TypingGuard::new(),
            narration_delay: DEFAULT_NARRATION_DELAY,
            replies_tx,
            replies_rx,
        }
    }

    /// Changes the pause before new narration is spoken.
    #[must_use]
    pub fn with_narration_delay(mut self, delay: Duration) -> Self {
        self.narration_delay = delay;
        self
    }

    /// Read access to the game state.
    #[must_use]
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Runs one command.
    ///
    /// # Errors
    ///
    /// Returns `PlayError` when the command is not allowed right now or its
    /// arguments are rejected. The state is unchanged in that case.
    pub async fn execute(&mut self, command: Command) -> Result<Response, PlayError> {
        match command {
            Command::AddPlayer(name) => self.add_player(&name),
            Command::RemovePlayer(number) => self.remove_player(number),
            Command::Genre(None) => Ok(Response::Info(render::render_genres())),
            Command::Genre(Some(name)) => {
                let genre = find_genre(&name).ok_or(PlayError::UnknownGenre(name))?;
                self.choose_setup(SetupMode::Genre, genre.name, None)
            }
            Command::Custom { backstory, title } => {
                self.choose_setup(SetupMode::Custom, &backstory, title.as_deref())
            }
            Command::Start => self.start(),
            Command::Action(action) => {
                let pending = begin_turn(&mut self.store, &action)?;
                self.note_typing(Input::Story, &action);
                self.request_narration(pending);
                Ok(Response::Info(render::render_turn(&self.store)))
            }
            Command::Chat { sender, text } => self.chat(&sender, &text),
            Command::ToggleNarrate => Ok(Response::Info(self.toggle_narrate())),
            Command::ToggleTheme => {
                self.store.toggle_dark_mode();
                let theme = if self.store.is_dark_mode() { "Dark" } else { "Light" };
                Ok(Response::Info(format!("{theme} theme")))
            }
            Command::Pause => Ok(if self.narration.pause() {
                Response::Silent
            } else {
                Response::Info("Nothing is being narrated".to_owned())
            }),
            Command::Resume => Ok(if self.narration.resume() {
                Response::Silent
            } else {
                Response::Info("Narration is not paused".to_owned())
            }),
            Command::Stop => {
                self.narration.stop(&mut self.store);
                Ok(Response::Silent)
            }
            Command::Reset => {
                self.store.reset_game();
                self.narration.stop(&mut self.store);
                Ok(Response::Info("Back to the lobby".to_owned()))
            }
            Command::Translate { lang, text } => self.translate(lang, text).await,
            Command::Players => Ok(Response::Info(render::render_players(&self.store))),
            Command::Log => Ok(Response::Info(render::render_logs(&self.store))),
            Command::Help => Ok(Response::Info(render::HELP.to_owned())),
            Command::Quit => {
                self.narration.stop(&mut self.store);
                Ok(Response::Quit)
            }
        }
    }

    /// Waits for the next background event.
    pub async fn next_event(&mut self) -> TableEvent {
        tokio::select! {
            Some(reply) = self.replies_rx.recv() => TableEvent::Narration(reply),
            Some(event) = self.narration.recv_event() => TableEvent::Speech(event),
            else => TableEvent::Closed,
        }
    }

    /// Applies a background event. Returns the narrator line to show when a
    /// reply was appended.
    pub async fn handle_event(&mut self, event: TableEvent) -> Option<String> {
        match event {
            TableEvent::Narration(reply) => {
                if self.deliver(reply).await {
                    render::render_latest_narration(&self.store)
                } else {
                    None
                }
            }
            TableEvent::Speech(event) => {
                self.narration.apply_event(&mut self.store, event);
                None
            }
            TableEvent::Closed => None,
        }
    }

    /// Appends a narrator reply and, after the narration delay, speaks it.
    /// Returns whether the reply was appended.
    pub async fn deliver(&mut self, reply: NarrationReply) -> bool {
        if !deliver_narration(&mut self.store, &reply) {
            return false;
        }
        if let Some(text) = self.narration.observe_story(&self.store) {
            if !self.narration_delay.is_zero() {
                tokio::time::sleep(self.narration_delay).await;
            }
            self.narration.speak(&mut self.store, &text);
        }
        true
    }

    /// Applies every speech event received so far.
    pub fn pump_speech(&mut self) -> usize {
        self.narration.pump_events(&mut self.store)
    }

    fn note_typing(&mut self, input: Input, text: &str) {
        let guard = match input {
            Input::Story => &mut self.story_input,
            Input::Chat => &mut self.chat_input,
        };
        self.narration
            .interrupt_for_typing(&mut self.store, guard, text);
        // Submitting clears the field.
        guard.on_input("");
    }

    fn add_player(&mut self, name: &str) -> Result<Response, PlayError> {
        if self.store.is_started() {
            return Err(PlayError::RosterLocked);
        }
        if name.trim().eq_ignore_ascii_case(NARRATOR) {
            return Err(PlayError::ReservedName(name.trim().to_owned()));
        }
        self.store.add_player(name).ok_or(PlayError::BlankName)?;
        Ok(Response::Info(render::render_turn(&self.store)))
    }

    fn remove_player(&mut self, number: usize) -> Result<Response, PlayError> {
        if self.store.is_started() {
            return Err(PlayError::RosterLocked);
        }
        let player = number
            .checked_sub(1)
            .and_then(|index| self.store.players().get(index))
            .ok_or(PlayError::NoSuchPlayer(number))?;
        let (id, name) = (player.id, player.name.clone());
        self.store.remove_player(id);
        Ok(Response::Info(format!("{name} left the table")))
    }

    fn chat(&mut self, sender: &str, text: &str) -> Result<Response, PlayError> {
        if !self.store.is_started() || self.store.players().is_empty() {
            return Err(PlayError::ChatClosed);
        }
        let name = self
            .store
            .players()
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(sender.trim()))
            .map(|p| p.name.clone())
            .ok_or_else(|| PlayError::NotSeated(sender.trim().to_owned()))?;
        self.note_typing(Input::Chat, text);
        self.store.add_chat_message(&name, text);
        Ok(Response::Silent)
    }

    fn choose_setup(
        &mut self,
        mode: SetupMode,
        value: &str,
        title: Option<&str>,
    ) -> Result<Response, PlayError> {
        if self.store.is_started() && !self.store.show_setup_modal() {
            return Err(PlayError::SetupLocked);
        }
        self.store.set_game_setup(mode, value, title);
        let mut message = format!("Story: {}", self.store.story_title());
        if self.store.is_started() {
            self.store.set_show_setup_modal(false);
            self.request_opening();
            message.push_str("\nThe narrator sets the scene...");
        }
        Ok(Response::Info(message))
    }

    fn start(&mut self) -> Result<Response, PlayError> {
        if self.store.is_started() {
            return Err(PlayError::AlreadyStarted);
        }
        if !self.store.can_start() {
            return Err(PlayError::NotEnoughPlayers(MIN_PLAYERS));
        }
        self.store.start_game();
        info!(players = self.store.players().len(), "story started");

        if self.store.setup().is_some() {
            self.request_opening();
            Ok(Response::Info(format!(
                "{}: the narrator sets the scene...",
                self.store.story_title()
            )))
        } else {
            self.store.set_show_setup_modal(true);
            Ok(Response::Info(
                "Choose /genre NAME or /custom STORY to set the scene".to_owned(),
            ))
        }
    }

    fn toggle_narrate(&mut self) -> String {
        match self.store.toggle_narrate() {
            NarrateToggle::Enabled { catch_up } => {
                if let Some(text) = catch_up {
                    self.narration.speak(&mut self.store, &text);
                }
                "Narration on".to_owned()
            }
            NarrateToggle::Disabled => {
                self.narration.sync_narrate_enabled(&mut self.store);
                "Narration off".to_owned()
            }
        }
    }

    async fn translate(&mut self, lang: Option<String>, text: String) -> Result<Response, PlayError> {
        let lang = lang.unwrap_or_else(|| load_last_language(self.storage.as_ref()).to_owned());
        let request = TranslationRequest::new(Some(text), Some(lang))?;

        let outcome = self.translator.translate(&request).await?;

        save_last_language(self.storage.as_ref(), request.target_lang());
        Ok(Response::Info(format!(
            "[{} via {}] {}",
            request.target_lang(),
            outcome.provider,
            outcome.translated_text
        )))
    }

    fn request_opening(&mut self) {
        let pending = begin_opening(&mut self.store, None);
        self.request_narration(pending);
    }

    fn request_narration(&self, pending: PendingNarration) {
        debug!(kind = ?pending.kind(), "requesting narration");
        let generator = Arc::clone(&self.generator);
        let replies = self.replies_tx.clone();
        tokio::spawn(async move {
            let reply = pending.resolve(generator.as_ref()).await;
            let _ = replies.send(reply);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colore_core::speech::SpeechEventKind;
    use colore_core::storage::LAST_TRANSLATE_LANGUAGE_KEY;
    use colore_test_support::{
        FakeSynthesizer, FixedClock, MemoryStorage, ScriptedGenerator, ScriptedTranslator,
    };

    struct Harness {
        table: Table,
        synth: Arc<FakeSynthesizer>,
        storage: Arc<MemoryStorage>,
    }

    fn harness(replies: &[&str]) -> Harness {
        let storage = Arc::new(MemoryStorage::new());
        let store = GameStore::new(Arc::new(FixedClock::standard()), storage.clone(), false);
        let synth = Arc::new(FakeSynthesizer::new());
        let table = Table::new(
            store,
            NarrationController::new(synth.clone()),
            Arc::new(ScriptedGenerator::new(replies.iter().copied())),
            Arc::new(FallbackTranslator::new(vec![Arc::new(ScriptedTranslator::new(
                "LibreTranslate",
            ))])),
            storage.clone(),
        )
        .with_narration_delay(Duration::ZERO);
        Harness {
            table,
            synth,
            storage,
        }
    }

    async fn run(table: &mut Table, line: &str) -> Result<Response, PlayError> {
        let command = Command::parse(line)?.expect("non-blank line");
        table.execute(command).await
    }

    /// Handles background events until a narrator reply has been processed.
    async fn settle_narration(table: &mut Table) -> Option<String> {
        loop {
            match table.next_event().await {
                TableEvent::Narration(reply) => {
                    return table.handle_event(TableEvent::Narration(reply)).await;
                }
                TableEvent::Closed => return None,
                speech => {
                    table.handle_event(speech).await;
                }
            }
        }
    }

    async fn seated(replies: &[&str]) -> Harness {
        let mut h = harness(replies);
        run(&mut h.table, "/add Alice").await.unwrap();
        run(&mut h.table, "/add Bob").await.unwrap();
        h
    }

    #[tokio::test]
    async fn test_turn_passes_before_narrator_replies() {
        // Arrange
        let mut h = seated(&["The forest hushes.", "The door swings open."]).await;
        run(&mut h.table, "/genre Fantasy").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;

        // Act
        let response = run(&mut h.table, "open the door").await.unwrap();

        // Assert: the turn moved before the reply exists
        assert_eq!(response, Response::Info("Bob's turn (2 of 2)".into()));
        let log = h.table.store().story_log();
        assert_eq!(log.last().unwrap().sender, "Alice");
        assert_eq!(h.table.store().current_turn(), 1);

        // Act: the reply lands
        let shown = settle_narration(&mut h.table).await;

        // Assert
        let log = h.table.store().story_log();
        assert_eq!(log.last().unwrap().sender, NARRATOR);
        assert_eq!(log.last().unwrap().content, "The door swings open.");
        assert!(shown.unwrap().contains("The door swings open."));
        assert_eq!(h.synth.spoken_texts().last().unwrap(), "The door swings open.");
    }

    #[tokio::test]
    async fn test_turning_narration_back_on_repeats_latest_narration() {
        // Arrange
        let mut h = seated(&["Hello", "A door appears"]).await;
        run(&mut h.table, "/genre Mystery").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;
        run(&mut h.table, "knock").await.unwrap();
        settle_narration(&mut h.table).await;

        // Act
        run(&mut h.table, "/narrate").await.unwrap();
        let before = h.synth.spoken().len();
        run(&mut h.table, "/narrate").await.unwrap();

        // Assert
        let spoken = h.synth.spoken_texts();
        assert_eq!(spoken.len(), before + 1);
        assert_eq!(spoken.last().unwrap(), "A door appears");
    }

    #[tokio::test]
    async fn test_turning_narration_off_stops_speech() {
        let mut h = seated(&["Hello"]).await;
        run(&mut h.table, "/genre Horror").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;
        h.synth.emit(SpeechEventKind::Start);
        h.table.pump_speech();
        assert!(h.table.store().is_speaking());

        run(&mut h.table, "/narrate").await.unwrap();

        assert!(!h.table.store().is_speaking());
        assert!(h.synth.active().is_none());
    }

    #[tokio::test]
    async fn test_typing_an_action_interrupts_narration() {
        // Arrange
        let mut h = seated(&["Hello", "Later"]).await;
        run(&mut h.table, "/genre Sci-Fi").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;
        h.synth.emit(SpeechEventKind::Start);
        h.table.pump_speech();
        let cancels = h.synth.cancel_count();

        // Act
        run(&mut h.table, "draw my sword").await.unwrap();

        // Assert
        assert_eq!(h.synth.cancel_count(), cancels + 1);
        assert!(!h.table.store().is_speaking());
    }

    #[tokio::test]
    async fn test_rejected_action_leaves_narration_playing() {
        // Arrange
        let mut h = seated(&["Hello"]).await;
        run(&mut h.table, "/genre Fantasy").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;
        h.synth.emit(SpeechEventKind::Start);
        h.table.pump_speech();
        let cancels = h.synth.cancel_count();

        // Act: a blank action never reaches the parser, so send one directly
        let result = h.table.execute(Command::Action("   ".into())).await;

        // Assert
        assert!(matches!(result, Err(PlayError::Turn(_))));
        assert_eq!(h.synth.cancel_count(), cancels);
        assert!(h.table.store().is_speaking());
    }

    #[tokio::test]
    async fn test_start_requires_two_players() {
        let mut h = harness(&[]);
        run(&mut h.table, "/add Alice").await.unwrap();

        let result = run(&mut h.table, "/start").await;

        assert!(matches!(result, Err(PlayError::NotEnoughPlayers(2))));
        assert!(!h.table.store().is_started());
    }

    #[tokio::test]
    async fn test_start_without_setup_asks_for_one() {
        // Arrange
        let mut h = seated(&["Neon rain falls."]).await;

        // Act
        run(&mut h.table, "/start").await.unwrap();

        // Assert
        assert!(h.table.store().show_setup_modal());

        // Act: choosing the setup opens the story
        run(&mut h.table, "/custom A heist in a neon city | Neon Heist")
            .await
            .unwrap();
        settle_narration(&mut h.table).await;

        // Assert
        assert!(!h.table.store().show_setup_modal());
        assert_eq!(h.table.store().story_title(), "Neon Heist");
        assert_eq!(h.table.store().story_log()[0].content, "Neon rain falls.");
        assert!(matches!(
            run(&mut h.table, "/genre Fantasy").await,
            Err(PlayError::SetupLocked)
        ));
    }

    #[tokio::test]
    async fn test_roster_is_locked_once_started() {
        let mut h = seated(&["Hello"]).await;
        run(&mut h.table, "/start").await.unwrap();

        assert!(matches!(
            run(&mut h.table, "/add Carol").await,
            Err(PlayError::RosterLocked)
        ));
        assert!(matches!(
            run(&mut h.table, "/remove 1").await,
            Err(PlayError::RosterLocked)
        ));
    }

    #[tokio::test]
    async fn test_remove_player_by_number() {
        let mut h = seated(&[]).await;

        let response = run(&mut h.table, "/remove 1").await.unwrap();

        assert_eq!(response, Response::Info("Alice left the table".into()));
        assert_eq!(h.table.store().players()[0].name, "Bob");
        assert!(matches!(
            run(&mut h.table, "/remove 5").await,
            Err(PlayError::NoSuchPlayer(5))
        ));
    }

    #[tokio::test]
    async fn test_action_before_start_is_rejected() {
        let mut h = seated(&[]).await;

        let result = run(&mut h.table, "look around").await;

        assert!(matches!(result, Err(PlayError::Turn(_))));
        assert!(h.table.store().story_log().is_empty());
    }

    #[tokio::test]
    async fn test_chat_stays_out_of_the_story() {
        let mut h = seated(&["Hello"]).await;
        run(&mut h.table, "/start").await.unwrap();

        run(&mut h.table, "/chat bob: let's go left").await.unwrap();

        let chat = h.table.store().chat_log();
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].sender, "Bob");
        assert!(h.table.store().story_log().is_empty());
    }

    #[tokio::test]
    async fn test_chat_is_closed_in_the_lobby() {
        // Arrange
        let mut h = harness(&[]);

        // Act
        let empty_lobby = run(&mut h.table, "/chat Alice: anyone here?").await;
        run(&mut h.table, "/add Alice").await.unwrap();
        let seated_lobby = run(&mut h.table, "/chat Alice: anyone here?").await;

        // Assert
        assert!(matches!(empty_lobby, Err(PlayError::ChatClosed)));
        assert!(matches!(seated_lobby, Err(PlayError::ChatClosed)));
        assert!(h.table.store().chat_log().is_empty());
    }

    #[tokio::test]
    async fn test_chat_sender_must_be_seated() {
        // Arrange
        let mut h = seated(&["Hello"]).await;
        run(&mut h.table, "/start").await.unwrap();

        // Act
        let narrator = run(&mut h.table, "/chat AI Narrator: trust me").await;
        let stranger = run(&mut h.table, "/chat Mallory: psst").await;

        // Assert
        assert!(matches!(narrator, Err(PlayError::NotSeated(name)) if name == NARRATOR));
        assert!(matches!(stranger, Err(PlayError::NotSeated(name)) if name == "Mallory"));
        assert!(h.table.store().chat_log().is_empty());
    }

    #[tokio::test]
    async fn test_narrator_name_is_reserved() {
        let mut h = harness(&[]);

        let result = run(&mut h.table, "/add ai narrator").await;

        assert!(matches!(result, Err(PlayError::ReservedName(_))));
        assert!(h.table.store().players().is_empty());
    }

    #[tokio::test]
    async fn test_reply_after_reset_is_dropped() {
        // Arrange
        let mut h = seated(&["Hello", "Too late"]).await;
        run(&mut h.table, "/genre Fantasy").await.unwrap();
        run(&mut h.table, "/start").await.unwrap();
        settle_narration(&mut h.table).await;
        run(&mut h.table, "wait").await.unwrap();

        // Act
        run(&mut h.table, "/reset").await.unwrap();
        let shown = settle_narration(&mut h.table).await;

        // Assert
        assert!(shown.is_none());
        assert!(h.table.store().story_log().is_empty());
        assert!(h.table.store().players().is_empty());
    }

    #[tokio::test]
    async fn test_translate_remembers_language() {
        // Arrange
        let mut h = harness(&[]);

        // Act
        let first = run(&mut h.table, "/translate es Hello friend").await.unwrap();
        let second = run(&mut h.table, "/translate Goodbye").await.unwrap();

        // Assert
        assert_eq!(
            first,
            Response::Info("[es via LibreTranslate] [es] Hello friend".into())
        );
        assert_eq!(
            second,
            Response::Info("[es via LibreTranslate] [es] Goodbye".into())
        );
        assert_eq!(
            h.storage.value(LAST_TRANSLATE_LANGUAGE_KEY).as_deref(),
            Some("es")
        );
    }

    #[tokio::test]
    async fn test_theme_toggle_is_persisted() {
        let mut h = harness(&[]);

        let response = run(&mut h.table, "/theme").await.unwrap();

        assert_eq!(response, Response::Info("Dark theme".into()));
        assert_eq!(h.storage.value("theme").as_deref(), Some("dark"));
    }

    #[tokio::test]
    async fn test_pause_when_idle_reports_nothing_playing() {
        let mut h = harness(&[]);

        let response = run(&mut h.table, "/pause").await.unwrap();

        assert_eq!(
            response,
            Response::Info("Nothing is being narrated".into())
        );
    }
}
