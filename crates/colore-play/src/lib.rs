//! CoLore: terminal front-end.
//!
//! Wires the game store, narration controller, narrator and translation chain
//! together behind a line-oriented command interface.

pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod speech;
pub mod storage;
pub mod table;
