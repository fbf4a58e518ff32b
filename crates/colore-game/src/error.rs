//! Error types for turn handling.

use thiserror::Error;

/// Rejections raised before an action reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// The game has not been started yet.
    #[error("the game has not started")]
    NotStarted,

    /// There is nobody to take the turn.
    #[error("there are no players")]
    NoPlayers,

    /// The submitted action is blank.
    #[error("an action cannot be empty")]
    EmptyAction,
}
