//! Randomness used by the spawner and the tick engine.
//!
//! Every random decision in the simulation goes through [`RandomSource`],
//! so a run can be replayed from a seed or driven by a fixed script.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub trait RandomSource {
    /// True with probability `probability`.
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform integer in `[min, max]`, both ends included.
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }

    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        (**self).uniform_int(min, max)
    }
}

/// ChaCha8-backed source, reproducible when built from a seed
#[derive(Debug, Clone)]
pub struct ChaChaRandom {
    rng: ChaCha8Rng,
}

impl ChaChaRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for ChaChaRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() < probability
    }

    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..=max)
    }
}

/// Replays queued outcomes in order.
///
/// Once a queue runs dry, `chance` answers `false` and `uniform_int`
/// answers `min`. Queued integers are clamped into the requested range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    ints: VecDeque<i32>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    pub fn with_ints(mut self, ints: impl IntoIterator<Item = i32>) -> Self {
        self.ints.extend(ints);
        self
    }

    /// Outcomes not yet consumed, as (chances, ints)
    pub fn remaining(&self) -> (usize, usize) {
        (self.chances.len(), self.ints.len())
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        self.ints
            .pop_front()
            .map(|value| value.clamp(min, max))
            .unwrap_or(min)
    }
}
