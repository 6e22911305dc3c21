#![forbid(unsafe_code)]

//! Typed scene configuration.
//!
//! A [`SceneConfig`] serializes to the option tree the rendering engine
//! consumes (camelCase keys, engine enum spellings). Every section carries
//! `#[serde(default)]` so partially specified trees coming back from storage
//! or a shared link deserialize, as long as both `particles` and
//! `interactivity` are present. That presence check is
//! [`is_valid_configuration`] and is applied at every untyped boundary before
//! a tree is allowed anywhere near the engine.
//!
//! # Wire shape
//!
//! ```text
//! {
//!   "particles": { color, shape, opacity, size, stroke,     <- appearance
//!                  move: { speed, direction, outModes, ... },
//!                  collisions, wobble, rotate, links, ...   <- special fx
//!                  number: { value } },
//!   "interactivity": { detectsOn, events: { onHover, onClick }, modes },
//!   "background": { color }, "fpsLimit", "detectRetina", ...
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chaos::ChaosLevel;
use crate::error::{Result, SceneError};
use crate::palette;

/// `true` when `value` is an object holding both `particles` and
/// `interactivity`.
#[must_use]
pub fn is_valid_configuration(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key("particles") && map.contains_key("interactivity"))
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub particles: Particles,
    pub interactivity: Interactivity,
    #[serde(default)]
    pub background: Background,
    #[serde(default = "default_fps_limit")]
    pub fps_limit: u32,
    #[serde(default = "default_true")]
    pub detect_retina: bool,
    #[serde(default)]
    pub pause_on_blur: bool,
    #[serde(default)]
    pub pause_on_outside_viewport: bool,
}

fn default_fps_limit() -> u32 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particles: Particles::default(),
            interactivity: Interactivity::default(),
            background: Background::default(),
            fps_limit: default_fps_limit(),
            detect_retina: true,
            pause_on_blur: false,
            pause_on_outside_viewport: false,
        }
    }
}

impl SceneConfig {
    /// Validate and convert an untyped tree.
    pub fn from_value(value: Value) -> Result<Self> {
        if !is_valid_configuration(&value) {
            return Err(SceneError::invalid(
                "configuration must contain `particles` and `interactivity`",
            ));
        }
        serde_json::from_value(value).map_err(|err| SceneError::invalid(err.to_string()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|err| SceneError::invalid(err.to_string()))?;
        Self::from_value(value)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Structural equality of the serialized trees.
    #[must_use]
    pub fn same_scene(&self, other: &Self) -> bool {
        match (serde_json::to_value(self), serde_json::to_value(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    #[must_use]
    pub fn out_mode(&self) -> OutMode {
        self.particles.movement.out_modes.default
    }

    #[must_use]
    pub fn hover_mode(&self) -> HoverMode {
        self.interactivity.events.on_hover.mode
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub color: ColorValue,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            color: ColorValue::new(palette::DARK_BACKGROUND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorValue {
    pub value: String,
}

impl ColorValue {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn random() -> Self {
        Self::new(palette::RANDOM_COLOR)
    }

    #[must_use]
    pub fn is_random(&self) -> bool {
        self.value == palette::RANDOM_COLOR
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::new("#ffffff")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeValue {
    pub value: NumberRange,
}

impl RangeValue {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            value: NumberRange { min, max },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Switch {
    pub enable: bool,
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Particles {
    #[serde(flatten)]
    pub appearance: Appearance,
    #[serde(rename = "move")]
    pub movement: Movement,
    #[serde(flatten)]
    pub fx: SpecialFx,
    pub number: ParticleNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticleNumber {
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub color: ColorValue,
    pub shape: Shape,
    pub opacity: RangeValue,
    pub size: RangeValue,
    pub stroke: Stroke,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: ColorValue::default(),
            shape: Shape::Circle,
            opacity: RangeValue::new(0.3, 1.0),
            size: RangeValue::new(2.0, 11.0),
            stroke: Stroke::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stroke {
    pub width: f64,
    pub color: ColorValue,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: ColorValue::random(),
        }
    }
}

/// Particle shape. Only the kinds that need extra data carry an `options`
/// object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Star,
    Polygon { options: PolygonOptions },
    Line,
    Heart,
    RoundedRectangle,
    Character { options: CharacterOptions },
}

impl Default for Shape {
    fn default() -> Self {
        Self::Circle
    }
}

impl Shape {
    #[must_use]
    pub fn polygon(sides: u32) -> Self {
        Self::Polygon {
            options: PolygonOptions {
                polygon: PolygonSides { sides },
            },
        }
    }

    #[must_use]
    pub fn character(glyph: impl Into<String>) -> Self {
        Self::Character {
            options: CharacterOptions {
                character: CharacterGlyph {
                    value: glyph.into(),
                    fill: true,
                },
            },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle => ShapeKind::Circle,
            Self::Square => ShapeKind::Square,
            Self::Triangle => ShapeKind::Triangle,
            Self::Star => ShapeKind::Star,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::Line => ShapeKind::Line,
            Self::Heart => ShapeKind::Heart,
            Self::RoundedRectangle => ShapeKind::RoundedRectangle,
            Self::Character { .. } => ShapeKind::Character,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonOptions {
    pub polygon: PolygonSides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolygonSides {
    pub sides: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterOptions {
    pub character: CharacterGlyph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterGlyph {
    pub value: String,
    pub fill: bool,
}

/// Data-free discriminant of [`Shape`], used for palette sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Polygon,
    Line,
    Heart,
    RoundedRectangle,
    Character,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Movement {
    pub enable: bool,
    pub speed: f64,
    pub direction: Direction,
    pub random: bool,
    pub straight: bool,
    pub out_modes: OutModes,
    pub trail: Trail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attract: Option<MoveAttract>,
    pub gravity: Gravity,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            enable: true,
            speed: 2.0,
            direction: Direction::None,
            random: true,
            straight: false,
            out_modes: OutModes::default(),
            trail: Trail::default(),
            attract: None,
            gravity: Gravity::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    None,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutModes {
    pub default: OutMode,
}

impl OutModes {
    #[must_use]
    pub const fn new(mode: OutMode) -> Self {
        Self { default: mode }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutMode {
    #[default]
    Out,
    Bounce,
    Destroy,
    None,
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trail {
    pub enable: bool,
    pub length: f64,
    pub fill: TrailFill,
}

impl Default for Trail {
    fn default() -> Self {
        Self {
            enable: false,
            length: 3.0,
            fill: TrailFill::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailFill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveAttract {
    pub enable: bool,
    pub rotate: Rotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Gravity {
    pub enable: bool,
    pub acceleration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialFx {
    pub life: Switch,
    pub collisions: Collisions,
    pub wobble: Wobble,
    pub rotate: RotateFx,
    pub links: Links,
    /// Engine-side destroy behaviour; carried across shuffles untouched.
    pub destroy: Value,
    /// Engine-side emitters; carried across shuffles untouched.
    pub emitters: Vec<Value>,
    pub twinkle: Twinkle,
}

impl Default for SpecialFx {
    fn default() -> Self {
        Self {
            life: Switch::default(),
            collisions: Collisions::default(),
            wobble: Wobble::default(),
            rotate: RotateFx::default(),
            links: Links::default(),
            destroy: default_destroy(),
            emitters: Vec::new(),
            twinkle: Twinkle::default(),
        }
    }
}

#[must_use]
pub fn default_destroy() -> Value {
    json!({ "mode": "none" })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Collisions {
    pub enable: bool,
    pub mode: CollisionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionMode {
    #[default]
    Bounce,
    Destroy,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wobble {
    pub enable: bool,
    pub distance: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateFx {
    pub animation: RotateAnimation,
    pub direction: RotateDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateAnimation {
    pub enable: bool,
    pub speed: f64,
    pub sync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotateDirection {
    #[default]
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    pub enable: bool,
    pub distance: f64,
    pub color: ColorValue,
    pub opacity: f64,
    pub width: f64,
    pub triangles: Switch,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            enable: false,
            distance: 150.0,
            color: ColorValue::new(palette::DARK_LINK_COLOR),
            opacity: 0.4,
            width: 1.0,
            triangles: Switch::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Twinkle {
    pub particles: TwinkleParticles,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinkleParticles {
    pub enable: bool,
    pub frequency: f64,
    pub opacity: f64,
}

impl Default for TwinkleParticles {
    fn default() -> Self {
        Self {
            enable: false,
            frequency: 0.05,
            opacity: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Interactivity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Interactivity {
    pub detects_on: DetectsOn,
    pub events: InteractivityEvents,
    pub modes: InteractionModes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectsOn {
    #[default]
    Canvas,
    Window,
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractivityEvents {
    pub on_hover: HoverEvent,
    pub on_click: ClickEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverEvent {
    pub enable: bool,
    pub mode: HoverMode,
}

impl Default for HoverEvent {
    fn default() -> Self {
        Self {
            enable: true,
            mode: HoverMode::Repulse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickEvent {
    pub enable: bool,
    pub mode: ClickMode,
}

impl Default for ClickEvent {
    fn default() -> Self {
        Self {
            enable: true,
            mode: ClickMode::Push,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    #[default]
    Repulse,
    Grab,
    Bubble,
    Slow,
    Connect,
    Parallax,
    Attract,
    /// Only written by the cursor-particle override.
    Trail,
}

impl HoverMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repulse => "repulse",
            Self::Grab => "grab",
            Self::Bubble => "bubble",
            Self::Slow => "slow",
            Self::Connect => "connect",
            Self::Parallax => "parallax",
            Self::Attract => "attract",
            Self::Trail => "trail",
        }
    }
}

impl fmt::Display for HoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickMode {
    #[default]
    Push,
    Bubble,
    Remove,
    Trail,
    Absorb,
}

/// Parameters for every interaction mode, selected or not, so the engine can
/// switch modes at runtime without regenerating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionModes {
    pub repulse: DistanceMode,
    pub push: QuantityMode,
    pub bubble: BubbleMode,
    pub parallax: ParallaxMode,
    pub grab: DistanceMode,
    pub slow: SlowMode,
    pub connect: ConnectMode,
    pub remove: QuantityMode,
    pub trail: TrailMode,
    pub absorb: AbsorbMode,
    pub attract: AttractMode,
}

impl InteractionModes {
    /// Mode parameters at `chaos`; every chaos-dependent value is linear.
    #[must_use]
    pub fn scaled(chaos: ChaosLevel, hover: HoverMode) -> Self {
        let c = chaos.as_f64();
        Self {
            repulse: DistanceMode {
                distance: 50.0 + c * 10.0,
            },
            push: QuantityMode {
                quantity: u32::from(chaos.get()),
            },
            bubble: BubbleMode {
                distance: 100.0 + c * 15.0,
                size: 10.0 + c * 2.0,
                duration: 2.0,
            },
            parallax: ParallaxMode {
                enable: hover == HoverMode::Parallax,
                force: 5.0 * c,
                smooth: 10.0,
            },
            grab: DistanceMode {
                distance: 150.0 + c * 10.0,
            },
            slow: SlowMode {
                factor: 3.0,
                radius: 200.0,
            },
            connect: ConnectMode { radius: 150.0 },
            remove: QuantityMode {
                quantity: u32::from(chaos.get()),
            },
            trail: TrailMode::default(),
            absorb: AbsorbMode { speed: 2.0 + c },
            attract: AttractMode {
                distance: 200.0,
                speed: c / 2.0,
            },
        }
    }
}

impl Default for InteractionModes {
    fn default() -> Self {
        Self::scaled(ChaosLevel::default(), HoverMode::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceMode {
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuantityMode {
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BubbleMode {
    pub distance: f64,
    pub size: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParallaxMode {
    pub enable: bool,
    pub force: f64,
    pub smooth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SlowMode {
    pub factor: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectMode {
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailMode {
    pub delay: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_on_stop: Option<bool>,
}

impl Default for TrailMode {
    fn default() -> Self {
        Self {
            delay: 0.05,
            quantity: 1,
            pause_on_stop: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AbsorbMode {
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttractMode {
    pub distance: f64,
    pub speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_requires_both_sections() {
        assert!(!is_valid_configuration(&json!({})));
        assert!(!is_valid_configuration(&json!({ "particles": {} })));
        assert!(!is_valid_configuration(&json!([1, 2])));
        assert!(is_valid_configuration(
            &json!({ "particles": {}, "interactivity": {} })
        ));
    }

    #[test]
    fn minimal_tree_deserializes_with_defaults() {
        let config =
            SceneConfig::from_value(json!({ "particles": {}, "interactivity": {} })).unwrap();
        assert_eq!(config.fps_limit, 120);
        assert!(config.detect_retina);
        assert_eq!(config.out_mode(), OutMode::Out);
        assert_eq!(config.hover_mode(), HoverMode::Repulse);
    }

    #[test]
    fn from_value_rejects_missing_interactivity() {
        let err = SceneConfig::from_value(json!({ "particles": {} })).unwrap_err();
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn from_value_rejects_wrong_types() {
        let err =
            SceneConfig::from_value(json!({ "particles": 3, "interactivity": {} })).unwrap_err();
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn plain_shapes_have_no_options_key() {
        let value = serde_json::to_value(Shape::Star).unwrap();
        assert_eq!(value, json!({ "type": "star" }));
        let value = serde_json::to_value(Shape::RoundedRectangle).unwrap();
        assert_eq!(value, json!({ "type": "rounded-rectangle" }));
    }

    #[test]
    fn polygon_and_character_carry_options() {
        let value = serde_json::to_value(Shape::polygon(6)).unwrap();
        assert_eq!(
            value,
            json!({ "type": "polygon", "options": { "polygon": { "sides": 6 } } })
        );
        let value = serde_json::to_value(Shape::character("🦄")).unwrap();
        assert_eq!(value["options"]["character"]["fill"], json!(true));
        let back: Shape = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind(), ShapeKind::Character);
    }

    #[test]
    fn particles_flatten_appearance_and_fx() {
        let value = serde_json::to_value(SceneConfig::default()).unwrap();
        let particles = &value["particles"];
        assert!(particles.get("color").is_some());
        assert!(particles.get("links").is_some());
        assert!(particles.get("move").is_some());
        assert_eq!(particles["move"]["outModes"]["default"], json!("out"));
        assert_eq!(value["interactivity"]["events"]["onHover"]["mode"], json!("repulse"));
        assert_eq!(value["interactivity"]["detectsOn"], json!("canvas"));
        assert!(particles["move"].get("attract").is_none());
    }

    #[test]
    fn json_round_trip_preserves_scene() {
        let mut config = SceneConfig::default();
        config.particles.appearance.shape = Shape::polygon(9);
        config.particles.fx.emitters.push(json!({ "rate": { "quantity": 2 } }));
        config.interactivity.modes.trail.pause_on_stop = Some(true);
        let raw = config.to_json().unwrap();
        let back = SceneConfig::from_json_str(&raw).unwrap();
        assert_eq!(back, config);
        assert!(back.same_scene(&config));
    }

    #[test]
    fn same_scene_detects_differences() {
        let a = SceneConfig::default();
        let mut b = a.clone();
        b.particles.number.value = 7;
        assert!(!a.same_scene(&b));
    }

    #[test]
    fn scaled_modes_are_linear_in_chaos() {
        let low = InteractionModes::scaled(ChaosLevel::new(1), HoverMode::Grab);
        let high = InteractionModes::scaled(ChaosLevel::new(10), HoverMode::Parallax);
        assert_eq!(low.repulse.distance, 60.0);
        assert_eq!(high.repulse.distance, 150.0);
        assert_eq!(high.push.quantity, 10);
        assert!(!low.parallax.enable);
        assert!(high.parallax.enable);
        assert_eq!(high.attract.speed, 5.0);
    }
}
