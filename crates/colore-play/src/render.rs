//! Plain-text rendering of the table for the terminal.

use std::fmt::Write as _;

use colore_game::domain::message::Message;
use colore_game::domain::setup::GENRES;
use colore_game::domain::store::GameStore;
use colore_game::domain::theme::Theme;

/// Command reference printed by `/help`.
pub const HELP: &str = "\
Lobby:
  /add NAME                  add a player
  /remove NUMBER             remove a player
  /genre [NAME]              pick a genre (no name lists them)
  /custom STORY [| TITLE]    write your own backstory
  /start                     begin once two players have joined
Playing:
  any other line             the current player's action
  /chat NAME: MESSAGE        private player chat, hidden from the narrator
  /players  /log             roster and turn, story and chat logs
Narration:
  /narrate                   switch narration on or off
  /pause  /resume  /stop     control the voice
Other:
  /translate [LANG] TEXT     translate with the last language if none given
  /theme  /reset  /help  /quit";

struct Palette {
    narrator: &'static str,
    player: &'static str,
    dim: &'static str,
}

const RESET: &str = "\x1b[0m";

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            narrator: "\x1b[95m",
            player: "\x1b[96m",
            dim: "\x1b[90m",
        },
        Theme::Light => Palette {
            narrator: "\x1b[35m",
            player: "\x1b[34m",
            dim: "\x1b[2m",
        },
    }
}

fn theme_of(store: &GameStore) -> Theme {
    Theme::from_dark_mode(store.is_dark_mode())
}

/// One log line: time, sender and text.
#[must_use]
pub fn render_message(message: &Message, theme: Theme) -> String {
    let colours = palette(theme);
    let sender_colour = if message.is_from_narrator() {
        colours.narrator
    } else {
        colours.player
    };
    format!(
        "{dim}{time}{RESET} {sender_colour}{sender}{RESET}: {content}",
        dim = colours.dim,
        time = message.timestamp.format("%H:%M"),
        sender = message.sender,
        content = message.content,
    )
}

/// The newest narrator message, ready to print.
#[must_use]
pub fn render_latest_narration(store: &GameStore) -> Option<String> {
    store
        .last_narrator_message()
        .map(|m| render_message(m, theme_of(store)))
}

/// "Alice's turn (1 of 2)", or a lobby hint before the story starts.
#[must_use]
pub fn render_turn(store: &GameStore) -> String {
    if !store.is_started() {
        return format!("Lobby: {} player(s) joined", store.players().len());
    }
    match (store.current_player(), store.turn_position()) {
        (Some(player), Some((position, count))) => {
            format!("{}'s turn ({position} of {count})", player.name)
        }
        _ => "No players at the table".to_owned(),
    }
}

/// Numbered roster with the current player marked.
#[must_use]
pub fn render_players(store: &GameStore) -> String {
    let mut out = String::new();
    for (index, player) in store.players().iter().enumerate() {
        let marker = if store.is_started() && index == store.current_turn() {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(out, "{marker} {}. {}", index + 1, player.name);
    }
    out.push_str(&render_turn(store));
    out
}

/// The story log under its title, followed by the player chat.
#[must_use]
pub fn render_logs(store: &GameStore) -> String {
    let theme = theme_of(store);
    let mut out = String::new();
    let title = if store.story_title().is_empty() {
        "Story"
    } else {
        store.story_title()
    };
    let _ = writeln!(out, "== {title} ==");
    for message in store.story_log() {
        let _ = writeln!(out, "{}", render_message(message, theme));
    }
    out.push_str("== Player chat ==");
    for message in store.chat_log() {
        let _ = write!(out, "\n{}", render_message(message, theme));
    }
    out
}

/// The genre catalogue.
#[must_use]
pub fn render_genres() -> String {
    GENRES
        .iter()
        .map(|g| format!("  {:<18}{}", g.name, g.description))
        .collect::<Vec<_>>()
        .join("\n")
}
