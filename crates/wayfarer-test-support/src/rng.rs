//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use wayfarer_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min`. Suitable for tests that do not
/// depend on specific die values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// Hands out scripted dice in order, ignoring the requested range.
///
/// # Panics
///
/// `next_u32_range` panics once the script runs out, naming the roll that
/// was asked for.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, _min: u32, _max: u32) -> u32 {
        let Some(&value) = self.values.get(self.index) else {
            panic!(
                "SequenceRng exhausted: roll #{} requested but only {} scripted ({:?})",
                self.index + 1,
                self.values.len(),
                self.values
            );
        };
        self.index += 1;
        value
    }
}
