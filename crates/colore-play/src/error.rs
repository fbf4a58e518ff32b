//! Front-end error types.

use colore_game::error::TurnError;
use colore_translation::error::TranslationError;
use thiserror::Error;

/// A line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The slash command is not recognised.
    #[error("unknown command `/{0}`, try /help")]
    Unknown(String),

    /// A required argument was left out.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// A player number was not a positive integer.
    #[error("`{0}` is not a player number")]
    InvalidNumber(String),

    /// An argument exceeded its length limit.
    #[error("{field} is too long (max {max} characters)")]
    TooLong {
        /// Which argument.
        field: &'static str,
        /// The limit in characters.
        max: usize,
    },
}

/// Errors reported back to the players.
#[derive(Debug, Error)]
pub enum PlayError {
    /// The line could not be parsed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The store refused the turn.
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// Translation failed.
    #[error(transparent)]
    Translation(#[from] TranslationError),

    /// A player name was blank.
    #[error("player names cannot be blank")]
    BlankName,

    /// No player has that number.
    #[error("there is no player {0}")]
    NoSuchPlayer(usize),

    /// The roster is locked once the story begins.
    #[error("players cannot change once the story has started")]
    RosterLocked,

    /// Fewer than the minimum number of players joined.
    #[error("at least {0} players are needed to start")]
    NotEnoughPlayers(usize),

    /// `/start` was used twice.
    #[error("the story has already started")]
    AlreadyStarted,

    /// The setup can only be chosen before the opening scene.
    #[error("the story setup is already chosen, /reset to pick another")]
    SetupLocked,

    /// The genre name did not match the catalogue.
    #[error("unknown genre `{0}`, try /genre with no name for the list")]
    UnknownGenre(String),

    /// The name belongs to the narrator.
    #[error("`{0}` is reserved for the narrator")]
    ReservedName(String),

    /// Chat opens once the story has started.
    #[error("chat opens once the story has started")]
    ChatClosed,

    /// Only seated players can chat.
    #[error("`{0}` is not at the table")]
    NotSeated(String),
}
