//! Deterministic test doubles.

use crate::casino::{GameRng, RandomSource};
use std::collections::VecDeque;

/// Random source that replays a fixed script, then falls back to a seeded [`GameRng`].
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    script: VecDeque<f64>,
    fallback: GameRng,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: values.into_iter().collect(),
            fallback: GameRng::from_seed(0),
        }
    }

    /// Script that makes `next_index(len)` return each of `indices` in turn.
    pub fn from_indices(indices: &[usize], len: usize) -> Self {
        Self::new(
            indices
                .iter()
                .map(|&idx| (idx as f64 + 0.5) / len as f64),
        )
    }

    /// Append more scripted values.
    pub fn push(&mut self, value: f64) {
        self.script.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        match self.script.pop_front() {
            Some(value) => value.clamp(0.0, 1.0 - f64::EPSILON),
            None => self.fallback.next_f64(),
        }
    }
}

/// Script for a Hi-Lo round whose shuffle leaves the deck in its unshuffled order.
///
/// Fisher-Yates swaps `i` with `next_index(i + 1)`; always choosing `j = i` is a no-op.
pub fn identity_shuffle_script(len: usize) -> Vec<f64> {
    (1..len).rev().map(|i| (i as f64 + 0.5) / (i + 1) as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::shuffle;

    #[test]
    fn test_scripted_values_then_fallback() {
        let mut rng = ScriptedRng::new([0.25, 0.75]);
        assert_eq!(rng.next_f64(), 0.25);
        assert_eq!(rng.next_f64(), 0.75);
        let value = rng.next_f64();
        assert!((0.0..1.0).contains(&value));
    }

    #[test]
    fn test_from_indices() {
        let mut rng = ScriptedRng::from_indices(&[0, 3, 24], 25);
        assert_eq!(rng.next_index(25), 0);
        assert_eq!(rng.next_index(25), 3);
        assert_eq!(rng.next_index(25), 24);
    }

    #[test]
    fn test_identity_shuffle_script() {
        let mut rng = ScriptedRng::new(identity_shuffle_script(10));
        let mut values: Vec<u8> = (0..10).collect();
        shuffle(&mut rng, &mut values);
        assert_eq!(values, (0..10).collect::<Vec<u8>>());
        assert_eq!(rng.remaining(), 0);
    }
}
