//! CoLore Core: shared abstractions.
//!
//! This crate defines the capability traits that the game state machine and
//! narration controller depend on: time, randomness, preference storage,
//! speech synthesis, text generation and translation. It contains no
//! infrastructure code.

pub mod clock;
pub mod error;
pub mod generation;
pub mod rng;
pub mod speech;
pub mod storage;
pub mod translation;
