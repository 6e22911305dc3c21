#![forbid(unsafe_code)]

//! Scene section generators.
//!
//! Each method produces one independent section of a [`SceneConfig`]. All
//! magnitudes scale linearly with chaos and every binary feature switch goes
//! through [`scaled_probability`], so raising chaos never lowers an expected
//! value.
//!
//! [`SceneConfig`]: crate::scene::SceneConfig

use crate::chaos::ChaosLevel;
use crate::palette;
use crate::random::{SceneRng, scaled_probability};
use crate::scene::{
    Appearance, ClickEvent, CollisionMode, Collisions, ColorValue, DetectsOn, Direction, Gravity,
    HoverEvent, InteractionModes, Interactivity, InteractivityEvents, Links, MoveAttract,
    Movement, OutMode, OutModes, RangeValue, RotateAnimation, RotateDirection, RotateFx, Rotation,
    Shape, ShapeKind, SpecialFx, Stroke, Switch, Trail, TrailFill, Twinkle, TwinkleParticles,
    Wobble, default_destroy,
};
use crate::state::{AppState, OriginalInteractionModes};

pub const RANDOM_COLOR_BASE: f64 = 0.12;
pub const STROKE_BASE: f64 = 0.5;
pub const TRAIL_BASE: f64 = 0.4;
pub const MOVE_ATTRACT_BASE: f64 = 0.4;
pub const COLLISIONS_BASE: f64 = 0.6;
pub const WOBBLE_BASE: f64 = 0.5;
pub const ROTATE_BASE: f64 = 0.7;
pub const TRIANGLES_BASE: f64 = 0.3;
pub const TWINKLE_BASE: f64 = 0.4;
/// Links are not chaos-gated.
pub const LINKS_PROBABILITY: f64 = 0.6;

/// Inputs read from the store before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationParams {
    pub chaos: ChaosLevel,
    pub dark_mode: bool,
}

impl GenerationParams {
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            chaos: state.particles.chaos,
            dark_mode: state.ui.dark_mode,
        }
    }
}

pub struct SceneGenerator<'a> {
    rng: &'a mut SceneRng,
    params: GenerationParams,
}

impl<'a> SceneGenerator<'a> {
    pub fn new(rng: &'a mut SceneRng, params: GenerationParams) -> Self {
        Self { rng, params }
    }

    #[must_use]
    pub fn params(&self) -> GenerationParams {
        self.params
    }

    fn chance(&mut self, base: f64) -> bool {
        let p = scaled_probability(base, self.params.chaos);
        self.rng.bernoulli(p)
    }

    pub fn appearance(&mut self) -> Appearance {
        let c = self.params.chaos.as_f64();
        let shape = match *self.rng.pick(&palette::SHAPE_KINDS) {
            ShapeKind::Circle => Shape::Circle,
            ShapeKind::Square => Shape::Square,
            ShapeKind::Triangle => Shape::Triangle,
            ShapeKind::Star => Shape::Star,
            ShapeKind::Polygon => Shape::polygon(self.rng.int_in(3, 12)),
            ShapeKind::Line => Shape::Line,
            ShapeKind::Heart => Shape::Heart,
            ShapeKind::RoundedRectangle => Shape::RoundedRectangle,
            ShapeKind::Character => Shape::character(*self.rng.pick(palette::EMOJI)),
        };
        let color = if self.chance(RANDOM_COLOR_BASE) {
            ColorValue::random()
        } else {
            let palette = palette::color_palette(self.params.dark_mode);
            ColorValue::new(*self.rng.pick(palette))
        };
        let width = if self.chance(STROKE_BASE) {
            self.rng.uniform(1.0, 4.0)
        } else {
            0.0
        };
        Appearance {
            color,
            shape,
            opacity: RangeValue::new(0.3, 1.0),
            size: RangeValue::new(2.0, 2.0 + c * 1.8),
            stroke: Stroke {
                width,
                color: ColorValue::random(),
            },
        }
    }

    pub fn movement(&mut self) -> Movement {
        let c = self.params.chaos.as_f64();
        let speed = self.rng.uniform(c * 0.5, c * 2.0);
        let direction: Direction = *self.rng.pick(&palette::DIRECTIONS);
        let trail_enabled = self.chance(TRAIL_BASE);
        let trail = Trail {
            enable: trail_enabled,
            length: self.rng.uniform(3.0, 15.0),
            fill: TrailFill {
                color: Some(ColorValue::new(palette::background_color(
                    self.params.dark_mode,
                ))),
            },
        };
        let attract = self.chance(MOVE_ATTRACT_BASE).then(|| MoveAttract {
            enable: true,
            rotate: Rotation {
                x: self.rng.uniform(600.0, 1500.0),
                y: self.rng.uniform(600.0, 1500.0),
            },
        });
        Movement {
            enable: true,
            speed,
            direction,
            random: true,
            straight: false,
            out_modes: OutModes::new(OutMode::Out),
            trail,
            attract,
            gravity: Gravity::default(),
        }
    }

    /// Interaction section. When `record` is given the chosen hover and click
    /// modes are written into it.
    pub fn interaction(&mut self, record: Option<&mut OriginalInteractionModes>) -> Interactivity {
        let hover = *self.rng.pick(&palette::HOVER_MODES);
        let click = *self.rng.pick(&palette::SAFE_CLICK_MODES);
        if let Some(record) = record {
            record.hover = Some(hover);
            record.click = Some(click);
            record.click_enabled = Some(true);
        }
        Interactivity {
            detects_on: DetectsOn::Canvas,
            events: InteractivityEvents {
                on_hover: HoverEvent {
                    enable: true,
                    mode: hover,
                },
                on_click: ClickEvent {
                    enable: true,
                    mode: click,
                },
            },
            modes: InteractionModes::scaled(self.params.chaos, hover),
        }
    }

    /// Special effects. `destroy` and `emitters` are engine-side and carried
    /// over from `current` untouched.
    pub fn special_fx(&mut self, current: Option<&SpecialFx>) -> SpecialFx {
        let c = self.params.chaos.as_f64();
        let collisions = Collisions {
            enable: self.chance(COLLISIONS_BASE),
            mode: if self.rng.bernoulli_even() {
                CollisionMode::Bounce
            } else {
                CollisionMode::Destroy
            },
        };
        let wobble = Wobble {
            enable: self.chance(WOBBLE_BASE),
            distance: 1.0 + c / 2.0,
            speed: 3.0 + c / 2.0,
        };
        let rotate = RotateFx {
            animation: RotateAnimation {
                enable: self.chance(ROTATE_BASE),
                speed: 5.0 * c,
                sync: false,
            },
            direction: if self.rng.bernoulli_even() {
                RotateDirection::Clockwise
            } else {
                RotateDirection::CounterClockwise
            },
        };
        let links = Links {
            enable: self.rng.bernoulli(LINKS_PROBABILITY),
            distance: 150.0,
            color: ColorValue::new(palette::link_color(self.params.dark_mode)),
            opacity: 0.4,
            width: 1.0,
            triangles: Switch {
                enable: self.chance(TRIANGLES_BASE),
            },
        };
        let twinkle = Twinkle {
            particles: TwinkleParticles {
                enable: self.chance(TWINKLE_BASE),
                frequency: 0.05,
                opacity: 1.0,
            },
        };
        SpecialFx {
            life: Switch { enable: false },
            collisions,
            wobble,
            rotate,
            links,
            destroy: current.map_or_else(default_destroy, |fx| fx.destroy.clone()),
            emitters: current.map(|fx| fx.emitters.clone()).unwrap_or_default(),
            twinkle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(chaos: i64, dark_mode: bool) -> GenerationParams {
        GenerationParams {
            chaos: ChaosLevel::new(chaos),
            dark_mode,
        }
    }

    #[test]
    fn size_max_tracks_chaos() {
        let mut rng = SceneRng::seeded(1);
        let low = SceneGenerator::new(&mut rng, params(1, true)).appearance();
        let high = SceneGenerator::new(&mut rng, params(10, true)).appearance();
        assert!((low.size.value.max - 3.8).abs() < 1e-9);
        assert!((high.size.value.max - 20.0).abs() < 1e-9);
        assert_eq!(low.size.value.min, 2.0);
    }

    #[test]
    fn speed_lies_in_chaos_band() {
        let mut rng = SceneRng::seeded(2);
        for level in ChaosLevel::all() {
            let c = level.as_f64();
            for _ in 0..20 {
                let movement = SceneGenerator::new(
                    &mut rng,
                    GenerationParams {
                        chaos: level,
                        dark_mode: true,
                    },
                )
                .movement();
                assert!(movement.speed >= c * 0.5 && movement.speed < c * 2.0);
                assert_eq!(movement.out_modes.default, OutMode::Out);
            }
        }
    }

    #[test]
    fn trail_length_is_continuous_in_range() {
        let mut rng = SceneRng::seeded(9);
        let lengths: Vec<f64> = (0..200)
            .map(|_| {
                SceneGenerator::new(&mut rng, params(5, true))
                    .movement()
                    .trail
                    .length
            })
            .collect();
        assert!(lengths.iter().all(|len| (3.0..15.0).contains(len)));
        assert!(lengths.iter().any(|len| len.fract() != 0.0));
    }

    #[test]
    fn trail_fill_follows_theme() {
        let mut rng = SceneRng::seeded(3);
        let dark = SceneGenerator::new(&mut rng, params(5, true)).movement();
        let light = SceneGenerator::new(&mut rng, params(5, false)).movement();
        assert_eq!(
            dark.trail.fill.color,
            Some(ColorValue::new(palette::DARK_BACKGROUND))
        );
        assert_eq!(
            light.trail.fill.color,
            Some(ColorValue::new(palette::LIGHT_BACKGROUND))
        );
    }

    #[test]
    fn interaction_records_chosen_modes() {
        let mut rng = SceneRng::seeded(4);
        let mut record = OriginalInteractionModes::default();
        let interaction =
            SceneGenerator::new(&mut rng, params(5, true)).interaction(Some(&mut record));
        assert_eq!(record.hover, Some(interaction.events.on_hover.mode));
        assert_eq!(record.click, Some(interaction.events.on_click.mode));
        assert!(palette::HOVER_MODES.contains(&interaction.events.on_hover.mode));
        assert!(palette::SAFE_CLICK_MODES.contains(&interaction.events.on_click.mode));
    }

    #[test]
    fn special_fx_carries_engine_sections() {
        let mut rng = SceneRng::seeded(5);
        let mut current = SpecialFx::default();
        current.destroy = json!({ "mode": "split" });
        current.emitters = vec![json!({ "position": { "x": 50 } })];
        let fx = SceneGenerator::new(&mut rng, params(5, true)).special_fx(Some(&current));
        assert_eq!(fx.destroy, current.destroy);
        assert_eq!(fx.emitters, current.emitters);
        assert!(!fx.life.enable);

        let fresh = SceneGenerator::new(&mut rng, params(5, true)).special_fx(None);
        assert_eq!(fresh.destroy, json!({ "mode": "none" }));
        assert!(fresh.emitters.is_empty());
    }

    #[test]
    fn link_color_follows_theme() {
        let mut rng = SceneRng::seeded(6);
        let fx = SceneGenerator::new(&mut rng, params(5, false)).special_fx(None);
        assert_eq!(fx.links.color.value, palette::LIGHT_LINK_COLOR);
    }

    #[test]
    fn polygon_sides_within_bounds() {
        let mut rng = SceneRng::seeded(8);
        let mut polygons = 0;
        for _ in 0..500 {
            let appearance = SceneGenerator::new(&mut rng, params(5, true)).appearance();
            if let Shape::Polygon { options } = appearance.shape {
                polygons += 1;
                assert!((3..=12).contains(&options.polygon.sides));
            }
        }
        assert!(polygons > 0);
    }
}
