//! Shared test fakes and utilities for the CoLore storytelling game.

mod clock;
mod generation;
mod rng;
mod speech;
mod storage;
mod translation;

pub use clock::FixedClock;
pub use generation::{FailingGenerator, ScriptedGenerator};
pub use rng::SequenceRng;
pub use speech::FakeSynthesizer;
pub use storage::{FailingStorage, MemoryStorage};
pub use translation::{FailingTranslator, ScriptedTranslator};
