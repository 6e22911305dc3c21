#![forbid(unsafe_code)]

//! The chaos knob.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Integer knob in `[1, 10]` scaling every magnitude and probability the
/// generator produces. Level 5 is neutral.
///
/// Construction always clamps, so a `ChaosLevel` is in range by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChaosLevel(u8);

impl ChaosLevel {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(10);
    pub const NEUTRAL: Self = Self(5);

    /// Clamp `level` into range.
    #[must_use]
    pub fn new(level: i64) -> Self {
        Self(level.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    /// Parse a persisted value, rejecting anything out of range instead of
    /// clamping it.
    #[must_use]
    pub fn parse_strict(raw: &str) -> Option<Self> {
        let level = raw.trim().parse::<i64>().ok()?;
        (Self::MIN.0 as i64..=Self::MAX.0 as i64)
            .contains(&level)
            .then(|| Self(level as u8))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Every level from 1 through 10.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN.0..=Self::MAX.0).map(Self)
    }
}

impl Default for ChaosLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for ChaosLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for ChaosLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(Self::new(raw.round() as i64))
    }
}
