//! Scripted `DeterministicRng` for choosing canned lines in tests.

use colore_core::rng::DeterministicRng;

/// Replays a fixed list of draws, starting over when it runs out. Each draw
/// is clamped into the requested range so a script written for one catalogue
/// size cannot index past a smaller one.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceRng {
    /// Creates an RNG that yields `values` in order. An empty script always
    /// yields the lower bound.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let Some(&value) = self.values.get(self.cursor % self.values.len().max(1)) else {
            return min;
        };
        self.cursor += 1;
        value.clamp(min, max.max(min))
    }
}
