#![forbid(unsafe_code)]

//! Sampling helpers and the chaos-scaled probability curve.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::chaos::ChaosLevel;

/// Probability of a chaos-gated feature at `chaos`.
///
/// Level 5 leaves `base` untouched, level 10 doubles it and level 1 cuts it
/// to a fifth. The result is clamped to `[0, 1]`. This is the only place
/// chaos influences binary feature switches.
#[must_use]
pub fn scaled_probability(base: f64, chaos: ChaosLevel) -> f64 {
    (base * chaos.as_f64() / 5.0).clamp(0.0, 1.0)
}

/// Random source for scene generation.
///
/// Production code seeds from the OS; tests seed explicitly so that whole
/// scenes can be reproduced.
#[derive(Debug, Clone)]
pub struct SceneRng {
    inner: SmallRng,
}

impl SceneRng {
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[min, max)`. Returns `min` when the range is empty.
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.inner.random::<f64>() * (max - min) + min
    }

    /// Uniform integer in `[min, max]`.
    pub fn int_in(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.inner.random_range(min..=max)
    }

    /// `true` with probability `p`. Values outside `[0, 1]` saturate.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.inner.random::<f64>() < p
    }

    pub fn bernoulli_even(&mut self) -> bool {
        self.bernoulli(0.5)
    }

    /// Uniform choice from `items`.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty. Every palette in this crate is a non-empty
    /// constant.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "cannot pick from an empty palette");
        &items[self.inner.random_range(0..items.len())]
    }
}

impl Default for SceneRng {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
