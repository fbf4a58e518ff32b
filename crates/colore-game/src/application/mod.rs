//! Application layer: prompt building and turn orchestration.

pub mod prompt;
pub mod turn_handlers;
