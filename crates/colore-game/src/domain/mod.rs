//! Domain layer for the game state.

pub mod message;
pub mod player;
pub mod setup;
pub mod store;
pub mod theme;
