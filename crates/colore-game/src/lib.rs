//! CoLore: game state and turn orchestration.
//!
//! Responsible for players and turn order, the story and chat logs, the game
//! lifecycle (setup, active, reset), the theme preference, and handing player
//! actions to a text-generation provider.

pub mod application;
pub mod domain;
pub mod error;
pub mod narrator;
