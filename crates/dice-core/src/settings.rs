#![forbid(unsafe_code)]

//! Tunables for the dice, loadable from TOML or JSON.
//!
//! ```toml
//! # dice.toml
//! [engine]
//! container_id = "tsparticles"
//! fps_limit = 120
//!
//! [particles]
//! base_count = 20
//! per_chaos_level = 20
//!
//! [defaults]
//! chaos_level = 5
//! dark_mode = true
//! ```
//!
//! Every field defaults to the value the dice uses when no file is given, so
//! `DiceSettings::default()` behaves exactly like an empty file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chaos::ChaosLevel;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceSettings {
    pub engine: EngineSettings,
    pub particles: ParticleSettings,
    pub defaults: StartupDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Element id the rendering engine mounts into.
    pub container_id: String,
    pub fps_limit: u32,
    pub detect_retina: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            container_id: "tsparticles".to_owned(),
            fps_limit: 120,
            detect_retina: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSettings {
    pub base_count: u32,
    pub per_chaos_level: u32,
    pub gravity_acceleration: f64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            base_count: 20,
            per_chaos_level: 20,
            gravity_acceleration: 20.0,
        }
    }
}

impl ParticleSettings {
    /// Particle count for a scene at `chaos`.
    #[must_use]
    pub fn count_for(&self, chaos: ChaosLevel) -> u32 {
        self.base_count
            .saturating_add(self.per_chaos_level.saturating_mul(u32::from(chaos.get())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupDefaults {
    pub chaos_level: ChaosLevel,
    pub dark_mode: bool,
}

impl Default for StartupDefaults {
    fn default() -> Self {
        Self {
            chaos_level: ChaosLevel::NEUTRAL,
            dark_mode: true,
        }
    }
}

impl DiceSettings {
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(s)?;
        settings.checked()
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(s)?;
        settings.checked()
    }

    /// Returns a list of problems. Empty means usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.engine.container_id.trim().is_empty() {
            errors.push("engine.container_id must not be empty".to_owned());
        }
        if self.engine.fps_limit == 0 {
            errors.push("engine.fps_limit must be positive".to_owned());
        }
        let gravity = self.particles.gravity_acceleration;
        if !gravity.is_finite() || gravity < 0.0 {
            errors.push(format!(
                "particles.gravity_acceleration must be finite and non-negative, got {gravity}"
            ));
        }
        errors
    }

    fn checked(self) -> Result<Self, SettingsError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(SettingsError::Validation(errors))
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
