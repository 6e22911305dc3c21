#![forbid(unsafe_code)]

//! Application state store.
//!
//! [`AppState`] is an explicit context value owned by the runtime studio and
//! passed by reference. Mutation goes through plain field access for the
//! command layer, or through [`AppState::reduce`] for dispatched
//! [`StateAction`]s.

use serde_json::Value;

use crate::chaos::ChaosLevel;
use crate::error::{Result, SceneError};
use crate::scene::{ClickMode, HoverMode, OutMode, OutModes, SceneConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub dark_mode: bool,
    pub cursor_particle_on: bool,
    pub gravity_on: bool,
    pub walls_on: bool,
    pub paused: bool,
    /// Identifier of the element focused before a modal opened. Opaque here.
    pub last_focused: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            cursor_particle_on: false,
            gravity_on: false,
            walls_on: false,
            paused: false,
            last_focused: None,
        }
    }
}

/// Hover and click modes in force before the cursor override replaced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OriginalInteractionModes {
    pub hover: Option<HoverMode>,
    pub click: Option<ClickMode>,
    /// Whether clicks were enabled before the cursor particle disabled them.
    pub click_enabled: Option<bool>,
}

/// Values overwritten by the walls and cursor toggles, restored on disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OriginalModeMemory {
    pub out_modes: Option<OutModes>,
    pub interaction: OriginalInteractionModes,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleState {
    pub chaos: ChaosLevel,
    pub current: Option<SceneConfig>,
    pub original_modes: OriginalModeMemory,
    pub initial_from_link: Option<SceneConfig>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub ui: UiState,
    pub particles: ParticleState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleKey {
    Gravity,
    Walls,
    CursorParticle,
}

impl ToggleKey {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gravity => "Gravity",
            Self::Walls => "Walls",
            Self::CursorParticle => "Cursor particle",
        }
    }
}

/// The toggle flags plus the mode memory they depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSnapshot {
    pub gravity_on: bool,
    pub walls_on: bool,
    pub cursor_particle_on: bool,
    pub original_modes: OriginalModeMemory,
}

impl ToggleSnapshot {
    #[must_use]
    pub fn capture(state: &AppState) -> Self {
        Self {
            gravity_on: state.ui.gravity_on,
            walls_on: state.ui.walls_on,
            cursor_particle_on: state.ui.cursor_particle_on,
            original_modes: state.particles.original_modes,
        }
    }

    pub fn restore(&self, state: &mut AppState) {
        state.ui.gravity_on = self.gravity_on;
        state.ui.walls_on = self.walls_on;
        state.ui.cursor_particle_on = self.cursor_particle_on;
        state.particles.original_modes = self.original_modes;
    }
}

/// Values read back from durable storage at startup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoredState {
    pub dark_mode: Option<bool>,
    pub chaos: Option<ChaosLevel>,
    pub config: Option<SceneConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateAction {
    SetTheme(bool),
    SetChaosLevel(i64),
    ToggleGravity,
    ToggleWalls,
    ToggleCursor,
    TogglePause,
    SetConfig(Value),
    SetOriginalModes {
        out_modes: Option<OutModes>,
        hover: Option<HoverMode>,
        click: Option<ClickMode>,
    },
    InitFromStorage(RestoredState),
}

impl StateAction {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetTheme(_) => "set_theme",
            Self::SetChaosLevel(_) => "set_chaos_level",
            Self::ToggleGravity => "toggle_gravity",
            Self::ToggleWalls => "toggle_walls",
            Self::ToggleCursor => "toggle_cursor",
            Self::TogglePause => "toggle_pause",
            Self::SetConfig(_) => "set_config",
            Self::SetOriginalModes { .. } => "set_original_modes",
            Self::InitFromStorage(_) => "init_from_storage",
        }
    }

    /// The toggle this action flips, if any.
    #[must_use]
    pub const fn toggle_key(&self) -> Option<ToggleKey> {
        match self {
            Self::ToggleGravity => Some(ToggleKey::Gravity),
            Self::ToggleWalls => Some(ToggleKey::Walls),
            Self::ToggleCursor => Some(ToggleKey::CursorParticle),
            _ => None,
        }
    }
}

impl AppState {
    /// Fresh state with the given startup defaults.
    #[must_use]
    pub fn new(chaos: ChaosLevel, dark_mode: bool) -> Self {
        let mut state = Self::default();
        state.particles.chaos = chaos;
        state.ui.dark_mode = dark_mode;
        state
    }

    #[must_use]
    pub fn toggle(&self, key: ToggleKey) -> bool {
        match key {
            ToggleKey::Gravity => self.ui.gravity_on,
            ToggleKey::Walls => self.ui.walls_on,
            ToggleKey::CursorParticle => self.ui.cursor_particle_on,
        }
    }

    /// Flip `key` and return the new value.
    pub fn flip(&mut self, key: ToggleKey) -> bool {
        let flag = match key {
            ToggleKey::Gravity => &mut self.ui.gravity_on,
            ToggleKey::Walls => &mut self.ui.walls_on,
            ToggleKey::CursorParticle => &mut self.ui.cursor_particle_on,
        };
        *flag = !*flag;
        *flag
    }

    #[must_use]
    pub fn has_scene(&self) -> bool {
        self.particles.current.is_some()
    }

    /// Apply the synchronous part of `action`.
    ///
    /// Returns `Ok(true)` when the change has to be written to durable
    /// storage. Toggle actions only flip the flag; applying the effect to the
    /// live scene is the caller's job.
    pub fn reduce(&mut self, action: StateAction) -> Result<bool> {
        tracing::trace!(action = action.name(), "reducing state action");
        match action {
            StateAction::SetTheme(dark_mode) => {
                self.ui.dark_mode = dark_mode;
                Ok(true)
            }
            StateAction::SetChaosLevel(level) => {
                self.particles.chaos = ChaosLevel::new(level);
                Ok(true)
            }
            StateAction::ToggleGravity => {
                self.flip(ToggleKey::Gravity);
                Ok(false)
            }
            StateAction::ToggleWalls => {
                self.flip(ToggleKey::Walls);
                Ok(false)
            }
            StateAction::ToggleCursor => {
                self.flip(ToggleKey::CursorParticle);
                Ok(false)
            }
            StateAction::TogglePause => {
                self.ui.paused = !self.ui.paused;
                Ok(false)
            }
            StateAction::SetConfig(value) => {
                let config = SceneConfig::from_value(value)?;
                self.particles.current = Some(config);
                Ok(true)
            }
            StateAction::SetOriginalModes {
                out_modes,
                hover,
                click,
            } => {
                let memory = &mut self.particles.original_modes;
                memory.out_modes = out_modes;
                memory.interaction = OriginalInteractionModes {
                    hover,
                    click,
                    ..memory.interaction
                };
                Ok(false)
            }
            StateAction::InitFromStorage(restored) => {
                if let Some(dark_mode) = restored.dark_mode {
                    self.ui.dark_mode = dark_mode;
                }
                if let Some(chaos) = restored.chaos {
                    self.particles.chaos = chaos;
                }
                if let Some(config) = restored.config {
                    self.particles.current = Some(config);
                    self.derive_toggles_from_scene();
                }
                Ok(false)
            }
        }
    }

    /// Re-derive the toggle flags from the shape of the current scene.
    ///
    /// Walls are on when particles bounce, gravity when it is enabled, and
    /// the cursor particle when hovering leaves a trail.
    pub fn derive_toggles_from_scene(&mut self) {
        let Some(config) = self.particles.current.as_ref() else {
            return;
        };
        self.ui.walls_on = config.out_mode() == OutMode::Bounce;
        self.ui.gravity_on = config.particles.movement.gravity.enable;
        self.ui.cursor_particle_on = config.hover_mode() == HoverMode::Trail;
    }

    /// Check the invariants a loaded studio relies on.
    pub fn validate(&self) -> Result<()> {
        let level = self.particles.chaos.get();
        if !(ChaosLevel::MIN.get()..=ChaosLevel::MAX.get()).contains(&level) {
            return Err(SceneError::invalid(format!(
                "chaos level {level} out of range"
            )));
        }
        if self.particles.current.is_none() {
            return Err(SceneError::invalid("no scene configuration loaded"));
        }
        Ok(())
    }
}
