#![forbid(unsafe_code)]

//! Gravity, walls and cursor-particle overrides.
//!
//! Each `apply_*` function writes one override into a scene (or takes it
//! back out). Applying a toggle on and then off yields the scene it started
//! from, provided the mode memory started empty.

use crate::scene::{Gravity, HoverMode, OutMode, OutModes, SceneConfig, TrailMode};
use crate::settings::DiceSettings;
use crate::state::{OriginalModeMemory, ToggleKey, UiState};

/// Trail interaction written while the cursor particle is on.
pub const CURSOR_TRAIL: TrailMode = TrailMode {
    delay: 0.05,
    quantity: 1,
    pause_on_stop: Some(true),
};

pub fn apply_gravity(config: &mut SceneConfig, enabled: bool, acceleration: f64) {
    config.particles.movement.gravity = Gravity {
        enable: enabled,
        acceleration: if enabled { acceleration } else { 0.0 },
    };
}

pub fn apply_walls(config: &mut SceneConfig, enabled: bool, memory: &mut OriginalModeMemory) {
    let movement = &mut config.particles.movement;
    if enabled {
        if memory.out_modes.is_none() {
            memory.out_modes = Some(movement.out_modes);
        }
        movement.out_modes = OutModes::new(OutMode::Bounce);
    } else if let Some(original) = memory.out_modes.take() {
        movement.out_modes = original;
    }
}

pub fn apply_cursor(config: &mut SceneConfig, enabled: bool, memory: &mut OriginalModeMemory) {
    let interactivity = &mut config.interactivity;
    if enabled {
        if memory.interaction.hover.is_none() {
            memory.interaction.hover = Some(interactivity.events.on_hover.mode);
        }
        if memory.interaction.click_enabled.is_none() {
            memory.interaction.click_enabled = Some(interactivity.events.on_click.enable);
        }
        interactivity.modes.trail = CURSOR_TRAIL;
        interactivity.events.on_hover.mode = HoverMode::Trail;
        interactivity.events.on_click.enable = false;
    } else {
        interactivity.events.on_hover.mode =
            memory.interaction.hover.take().unwrap_or(HoverMode::Repulse);
        interactivity.events.on_click.enable =
            memory.interaction.click_enabled.take().unwrap_or(true);
        interactivity.modes.trail.pause_on_stop = None;
    }
}

/// Dispatch to the apply function for `key`.
pub fn apply_toggle(
    config: &mut SceneConfig,
    key: ToggleKey,
    enabled: bool,
    memory: &mut OriginalModeMemory,
    settings: &DiceSettings,
) {
    match key {
        ToggleKey::Gravity => {
            apply_gravity(config, enabled, settings.particles.gravity_acceleration);
        }
        ToggleKey::Walls => apply_walls(config, enabled, memory),
        ToggleKey::CursorParticle => apply_cursor(config, enabled, memory),
    }
}

/// Re-impose every active toggle on a freshly assembled scene.
///
/// Gravity is always written. Walls snapshot the out mode the first time
/// they see a scene and then force `bounce`. With walls off the out-mode
/// memory is dropped whenever the scene does not bounce. The cursor particle
/// remembers the hover mode it replaces; with it off the scene is left
/// untouched.
pub fn reapply_toggle_states(
    config: &mut SceneConfig,
    ui: &UiState,
    memory: &mut OriginalModeMemory,
    settings: &DiceSettings,
) {
    apply_gravity(config, ui.gravity_on, settings.particles.gravity_acceleration);

    if ui.walls_on {
        apply_walls(config, true, memory);
    } else if config.out_mode() != OutMode::Bounce {
        memory.out_modes = None;
    }

    if ui.cursor_particle_on {
        apply_cursor(config, true, memory);
    }
}
