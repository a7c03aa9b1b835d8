//! Seedable random source shared by every stochastic pass.

use std::{collections::VecDeque, fmt};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Uniform random source consulted by the generation passes.
///
/// Every stochastic decision in a cycle routes through one sampler, so a
/// fixed seed reproduces a fixed level as long as the call order is kept.
pub trait Sampler {
    /// Draws an integer uniformly from `min..=max`.
    fn uniform_int(&mut self, min: u32, max: u32) -> u32;

    /// Draws a float uniformly from `[0, 1)`.
    fn uniform_unit(&mut self) -> f32;

    /// Returns `true` with probability `probability`.
    fn chance(&mut self, probability: f32) -> bool {
        self.uniform_unit() < probability
    }

    /// Position of the underlying stream, when the sampler has one.
    fn stream_state(&self) -> Option<StreamState> {
        None
    }
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        (**self).uniform_int(min, max)
    }

    fn uniform_unit(&mut self) -> f32 {
        (**self).uniform_unit()
    }

    fn stream_state(&self) -> Option<StreamState> {
        (**self).stream_state()
    }
}

/// Seed and word offset of a ChaCha stream, enough to resume it exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamState {
    /// Seed the stream was created from.
    pub seed: u64,
    /// Number of 32-bit words consumed so far.
    pub word_pos: u128,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seed {} at word {}", self.seed, self.word_pos)
    }
}

/// [`Sampler`] backed by a single ChaCha stream.
#[derive(Clone, Debug)]
pub struct SeededSampler {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededSampler {
    /// Creates a sampler whose stream is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Resumes a stream at a previously logged [`StreamState`].
    #[must_use]
    pub fn from_state(state: StreamState) -> Self {
        let mut sampler = Self::from_seed(state.seed);
        sampler.rng.set_word_pos(state.word_pos);
        sampler
    }

    /// Creates a sampler seeded from a human readable phrase.
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self::from_seed(seed_from_phrase(phrase))
    }
}

impl Sampler for SeededSampler {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn uniform_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn stream_state(&self) -> Option<StreamState> {
        Some(StreamState {
            seed: self.seed,
            word_pos: self.rng.get_word_pos(),
        })
    }
}

/// Testing aid: a [`Sampler`] that replays scripted draws so pass tests can
/// force exact branches. Not meant for generating real levels.
///
/// Integer draws fall back to the range minimum and unit draws to the
/// configured fallback once their scripts run out. It reports no
/// [`StreamState`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedSampler {
    ints: VecDeque<u32>,
    units: VecDeque<f32>,
    fallback_unit: f32,
}

impl ScriptedSampler {
    /// Creates a sampler replaying the provided integer and unit draws.
    #[must_use]
    pub fn new(ints: impl IntoIterator<Item = u32>, units: impl IntoIterator<Item = f32>) -> Self {
        Self {
            ints: ints.into_iter().collect(),
            units: units.into_iter().collect(),
            fallback_unit: 0.0,
        }
    }

    /// Overrides the unit value returned once the unit script is exhausted.
    #[must_use]
    pub fn with_fallback_unit(mut self, fallback_unit: f32) -> Self {
        self.fallback_unit = fallback_unit;
        self
    }

    /// Number of scripted unit draws not yet consumed.
    #[must_use]
    pub fn remaining_units(&self) -> usize {
        self.units.len()
    }
}

impl Sampler for ScriptedSampler {
    fn uniform_int(&mut self, min: u32, max: u32) -> u32 {
        self.ints
            .pop_front()
            .map_or(min, |value| value.clamp(min, max.max(min)))
    }

    fn uniform_unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(self.fallback_unit)
    }
}

/// Derives a numeric seed from the first eight bytes of the phrase's SHA-256 digest.
#[must_use]
pub fn seed_from_phrase(phrase: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(phrase.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
