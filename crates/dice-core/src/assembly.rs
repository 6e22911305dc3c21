#![forbid(unsafe_code)]

//! Scene assembly: generator output merged into the live scene.

use std::fmt;

use crate::generator::{GenerationParams, SceneGenerator};
use crate::palette;
use crate::random::SceneRng;
use crate::scene::{Background, ColorValue, Particles, SceneConfig};
use crate::settings::DiceSettings;
use crate::state::AppState;
use crate::toggles::reapply_toggle_states;

/// Which section(s) of the scene a shuffle regenerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuffleScope {
    All,
    Appearance,
    Movement,
    Interaction,
    /// Special effects. Also regenerates the interaction section.
    Fx,
}

impl ShuffleScope {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Appearance => "Appearance",
            Self::Movement => "Movement",
            Self::Interaction => "Interaction",
            Self::Fx => "Special FX",
        }
    }
}

impl fmt::Display for ShuffleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the next scene for `scope`.
///
/// With nothing loaded, or for [`ShuffleScope::All`], every section is
/// regenerated. Otherwise the current scene is cloned and only the scoped
/// sections are replaced. The theme background, engine settings, particle
/// count and all active toggles are then imposed on the result.
///
/// Reads and writes `state.particles.original_modes`; nothing else in
/// `state` changes.
pub fn build_configuration(
    state: &mut AppState,
    rng: &mut SceneRng,
    settings: &DiceSettings,
    scope: ShuffleScope,
) -> SceneConfig {
    let params = GenerationParams::from_state(state);
    let memory = &mut state.particles.original_modes;
    let mut generator = SceneGenerator::new(rng, params);

    let mut config = match (scope, state.particles.current.as_ref()) {
        (ShuffleScope::Appearance, Some(current)) => {
            let mut next = current.clone();
            next.particles.appearance = generator.appearance();
            next
        }
        (ShuffleScope::Movement, Some(current)) => {
            let mut next = current.clone();
            next.particles.movement = generator.movement();
            next
        }
        (ShuffleScope::Interaction, Some(current)) => {
            let mut next = current.clone();
            next.interactivity = generator.interaction(Some(&mut memory.interaction));
            next
        }
        (ShuffleScope::Fx, Some(current)) => {
            let mut next = current.clone();
            next.particles.fx = generator.special_fx(Some(&current.particles.fx));
            next.interactivity = generator.interaction(Some(&mut memory.interaction));
            next
        }
        (ShuffleScope::All, _) | (_, None) => {
            let particles = Particles {
                appearance: generator.appearance(),
                movement: generator.movement(),
                fx: generator.special_fx(None),
                ..Particles::default()
            };
            SceneConfig {
                particles,
                interactivity: generator.interaction(Some(&mut memory.interaction)),
                ..SceneConfig::default()
            }
        }
    };

    config.background = Background {
        color: ColorValue::new(palette::background_color(params.dark_mode)),
    };
    config.fps_limit = settings.engine.fps_limit;
    config.detect_retina = settings.engine.detect_retina;
    config.pause_on_blur = false;
    config.pause_on_outside_viewport = false;
    config.particles.number.value = settings.particles.count_for(params.chaos);

    reapply_toggle_states(&mut config, &state.ui, memory, settings);
    tracing::debug!(
        scope = %scope,
        chaos = params.chaos.get(),
        count = config.particles.number.value,
        "assembled scene"
    );
    config
}

/// Rewrite the theme-dependent colors of `config` in place.
///
/// Background, link color and trail fill always follow the theme. A
/// non-random particle color is replaced by `particle_color`.
pub fn recolor_for_theme(config: &mut SceneConfig, dark_mode: bool, particle_color: &str) {
    config.background.color = ColorValue::new(palette::background_color(dark_mode));
    if !config.particles.appearance.color.is_random() {
        config.particles.appearance.color = ColorValue::new(particle_color);
    }
    config.particles.fx.links.color = ColorValue::new(palette::link_color(dark_mode));
    config.particles.movement.trail.fill.color =
        Some(ColorValue::new(palette::background_color(dark_mode)));
}
