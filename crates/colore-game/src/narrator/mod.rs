//! Text-generation providers for the narrator.

pub mod canned;
pub mod ollama;

pub use canned::CannedNarrator;
pub use ollama::OllamaNarrator;
