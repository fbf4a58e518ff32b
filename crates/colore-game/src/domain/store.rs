//! The game state store.
//!
//! `GameStore` is the single owner of players, turn order, both message
//! logs, lifecycle flags and user preferences. Every mutation goes through
//! one of its methods and runs to completion before anything else observes
//! the state.

use std::fmt;
use std::sync::Arc;

use colore_core::clock::Clock;
use colore_core::storage::Storage;
use tracing::{debug, info};

use super::message::{Channel, Message};
use super::player::{Player, PlayerId};
use super::setup::{DEFAULT_CUSTOM_TITLE, GameSetup, SetupMode};
use super::theme::{Theme, persist_theme, resolve_initial_theme};

/// Minimum number of players the front-end requires before starting.
pub const MIN_PLAYERS: usize = 2;

/// Counter bumped by every reset. Narration requests capture it so replies
/// that arrive after a reset can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionEpoch(u64);

impl SessionEpoch {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Result of flipping the narration flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrateToggle {
    /// Narration was switched on. `catch_up` holds the most recent narrator
    /// message, which should be spoken again.
    Enabled {
        /// Content of the latest narrator message, if there is one.
        catch_up: Option<String>,
    },
    /// Narration was switched off.
    Disabled,
}

/// Single source of truth for one table of players.
pub struct GameStore {
    clock: Arc<dyn Clock>,
    storage: Arc<dyn Storage>,
    players: Vec<Player>,
    current_turn: usize,
    story_log: Vec<Message>,
    chat_log: Vec<Message>,
    started: bool,
    setup: Option<GameSetup>,
    story_title: String,
    is_dark_mode: bool,
    narrate_enabled: bool,
    is_speaking: bool,
    show_setup_modal: bool,
    pending_narrations: usize,
    epoch: SessionEpoch,
}

impl fmt::Debug for GameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStore")
            .field("players", &self.players)
            .field("current_turn", &self.current_turn)
            .field("story_log", &self.story_log.len())
            .field("chat_log", &self.chat_log.len())
            .field("started", &self.started)
            .field("setup", &self.setup)
            .field("is_dark_mode", &self.is_dark_mode)
            .field("narrate_enabled", &self.narrate_enabled)
            .field("is_speaking", &self.is_speaking)
            .field("pending_narrations", &self.pending_narrations)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl GameStore {
    /// Creates a store for a new session. The theme is read from `storage`,
    /// falling back to `system_prefers_dark`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn Storage>, system_prefers_dark: bool) -> Self {
        let theme = resolve_initial_theme(storage.as_ref(), system_prefers_dark);
        Self {
            clock,
            storage,
            players: Vec::new(),
            current_turn: 0,
            story_log: Vec::new(),
            chat_log: Vec::new(),
            started: false,
            setup: None,
            story_title: String::new(),
            is_dark_mode: theme.is_dark(),
            narrate_enabled: true,
            is_speaking: false,
            show_setup_modal: false,
            pending_narrations: 0,
            epoch: SessionEpoch::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Players and turns
    // ---------------------------------------------------------------------

    /// Appends a player. The name is trimmed; a blank name is ignored.
    pub fn add_player(&mut self, name: &str) -> Option<PlayerId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = PlayerId::generate();
        self.players.push(Player {
            id,
            name: name.to_owned(),
        });
        Some(id)
    }

    /// Removes the player with `id`, if present. If the turn index falls out
    /// of bounds it resets to 0; otherwise whoever now sits at that index
    /// holds the turn.
    pub fn remove_player(&mut self, id: PlayerId) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.current_turn >= self.players.len() {
            self.current_turn = 0;
        }
        self.players.len() != before
    }

    /// Passes the turn to the next player in order. No-op without players.
    pub fn next_turn(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.current_turn = (self.current_turn + 1) % self.players.len();
    }

    /// Players in turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Index of the player whose action is awaited; 0 when there are none.
    #[must_use]
    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// The player whose action is awaited.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_turn)
    }

    /// One-based turn position and player count, e.g. `(2, 3)` for
    /// "2 of 3". `None` without players.
    #[must_use]
    pub fn turn_position(&self) -> Option<(usize, usize)> {
        (!self.players.is_empty()).then(|| (self.current_turn + 1, self.players.len()))
    }

    // ---------------------------------------------------------------------
    // Logs
    // ---------------------------------------------------------------------

    /// Appends a trimmed message to the story log.
    pub fn add_story_message(&mut self, sender: &str, content: &str) {
        let message = self.message(sender, content, Channel::Story);
        self.story_log.push(message);
    }

    /// Appends a trimmed message to the chat log.
    pub fn add_chat_message(&mut self, sender: &str, content: &str) {
        let message = self.message(sender, content, Channel::Chat);
        self.chat_log.push(message);
    }

    fn message(&self, sender: &str, content: &str, channel: Channel) -> Message {
        Message {
            sender: sender.to_owned(),
            content: content.trim().to_owned(),
            channel,
            timestamp: self.clock.now(),
        }
    }

    /// Player actions and narrator replies, in append order.
    #[must_use]
    pub fn story_log(&self) -> &[Message] {
        &self.story_log
    }

    /// Private player chat, in append order.
    #[must_use]
    pub fn chat_log(&self) -> &[Message] {
        &self.chat_log
    }

    /// The most recent narrator message in the story log.
    #[must_use]
    pub fn last_narrator_message(&self) -> Option<&Message> {
        self.story_log.iter().rev().find(|m| m.is_from_narrator())
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Marks the game as started. Players and logs are left untouched.
    pub fn start_game(&mut self) {
        self.started = true;
        info!(players = self.players.len(), "game started");
    }

    /// Whether enough players have joined to start.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.players.len() >= MIN_PLAYERS
    }

    /// Whether the game is running.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Clears all game data and the setup selection. Theme and narration
    /// preferences survive.
    pub fn reset_game(&mut self) {
        self.players.clear();
        self.current_turn = 0;
        self.story_log.clear();
        self.chat_log.clear();
        self.started = false;
        self.setup = None;
        self.story_title.clear();
        self.show_setup_modal = false;
        self.pending_narrations = 0;
        self.epoch = self.epoch.next();
        info!(epoch = self.epoch.0, "game reset");
    }

    /// Identifies the current session; changes on every reset.
    #[must_use]
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    // ---------------------------------------------------------------------
    // Setup
    // ---------------------------------------------------------------------

    /// Records the setup choice. Choosing one mode clears the other. The
    /// title is the genre name, or for custom stories the given title
    /// (default [`DEFAULT_CUSTOM_TITLE`]).
    pub fn set_game_setup(&mut self, mode: SetupMode, value: &str, title: Option<&str>) {
        match mode {
            SetupMode::Genre => {
                self.story_title = value.to_owned();
                self.setup = Some(GameSetup::Genre(value.to_owned()));
            }
            SetupMode::Custom => {
                self.story_title = title
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_CUSTOM_TITLE)
                    .to_owned();
                self.setup = Some(GameSetup::Custom(value.to_owned()));
            }
        }
        debug!(title = %self.story_title, "game setup recorded");
    }

    /// The recorded setup, if any.
    #[must_use]
    pub fn setup(&self) -> Option<&GameSetup> {
        self.setup.as_ref()
    }

    /// The selected genre, if the setup is genre-based.
    #[must_use]
    pub fn selected_genre(&self) -> Option<&str> {
        match &self.setup {
            Some(GameSetup::Genre(genre)) => Some(genre),
            _ => None,
        }
    }

    /// The custom backstory, if the setup is custom.
    #[must_use]
    pub fn custom_backstory(&self) -> Option<&str> {
        match &self.setup {
            Some(GameSetup::Custom(backstory)) => Some(backstory),
            _ => None,
        }
    }

    /// Title derived from the setup; empty before setup.
    #[must_use]
    pub fn story_title(&self) -> &str {
        &self.story_title
    }

    // ---------------------------------------------------------------------
    // Preferences
    // ---------------------------------------------------------------------

    /// Flips the theme and persists it. A persistence failure is logged and
    /// the new value still applies.
    pub fn toggle_dark_mode(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        persist_theme(self.storage.as_ref(), Theme::from_dark_mode(self.is_dark_mode));
    }

    /// Whether the dark theme is active.
    #[must_use]
    pub fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    /// Flips narration. When switching on, hands back the latest narrator
    /// message so it can be spoken again.
    pub fn toggle_narrate(&mut self) -> NarrateToggle {
        self.narrate_enabled = !self.narrate_enabled;
        if self.narrate_enabled {
            NarrateToggle::Enabled {
                catch_up: self.last_narrator_message().map(|m| m.content.clone()),
            }
        } else {
            NarrateToggle::Disabled
        }
    }

    /// Whether narration is switched on.
    #[must_use]
    pub fn narrate_enabled(&self) -> bool {
        self.narrate_enabled
    }

    /// The only writer of the speaking flag; driven by speech lifecycle
    /// events.
    pub fn set_speaking(&mut self, speaking: bool) {
        self.is_speaking = speaking;
    }

    /// Whether speech is currently playing.
    #[must_use]
    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    // ---------------------------------------------------------------------
    // UI flags
    // ---------------------------------------------------------------------

    /// Shows or hides the setup dialog.
    pub fn set_show_setup_modal(&mut self, show: bool) {
        self.show_setup_modal = show;
    }

    /// Whether the setup dialog is shown.
    #[must_use]
    pub fn show_setup_modal(&self) -> bool {
        self.show_setup_modal
    }

    /// Counts one more narration request in flight.
    pub fn begin_generating(&mut self) {
        self.pending_narrations += 1;
    }

    /// Counts one in-flight narration request as answered.
    pub fn finish_generating(&mut self) {
        self.pending_narrations = self.pending_narrations.saturating_sub(1);
    }

    /// Number of narration requests still in flight in this session.
    #[must_use]
    pub fn pending_narrations(&self) -> usize {
        self.pending_narrations
    }

    /// Whether any narration request is in flight.
    #[must_use]
    pub fn is_generating_story(&self) -> bool {
        self.pending_narrations > 0
    }
}
