#![forbid(unsafe_code)]

//! Fixed palettes the generator samples from.

use crate::scene::{ClickMode, Direction, HoverMode, ShapeKind};

pub const SHAPE_KINDS: [ShapeKind; 9] = [
    ShapeKind::Circle,
    ShapeKind::Square,
    ShapeKind::Triangle,
    ShapeKind::Star,
    ShapeKind::Polygon,
    ShapeKind::Line,
    ShapeKind::Heart,
    ShapeKind::RoundedRectangle,
    ShapeKind::Character,
];

pub const DIRECTIONS: [Direction; 9] = [
    Direction::None,
    Direction::Top,
    Direction::TopRight,
    Direction::Right,
    Direction::BottomRight,
    Direction::Bottom,
    Direction::BottomLeft,
    Direction::Left,
    Direction::TopLeft,
];

pub const HOVER_MODES: [HoverMode; 7] = [
    HoverMode::Repulse,
    HoverMode::Grab,
    HoverMode::Bubble,
    HoverMode::Slow,
    HoverMode::Connect,
    HoverMode::Parallax,
    HoverMode::Attract,
];

/// Click modes considered safe for a shared scene. Destructive engine modes
/// are deliberately absent.
pub const SAFE_CLICK_MODES: [ClickMode; 5] = [
    ClickMode::Push,
    ClickMode::Bubble,
    ClickMode::Remove,
    ClickMode::Trail,
    ClickMode::Absorb,
];

pub const DARK_PALETTE: [&str; 8] = [
    "#ff007b", "#33ff57", "#3357ff", "#ffc300", "#ffffff", "#ad55ff", "#00f5d4", "#f15bb5",
];

pub const LIGHT_PALETTE: [&str; 8] = [
    "#f72585", "#7209b7", "#3a0ca3", "#4361ee", "#4cc9f0", "#f94144", "#f3722c", "#f9c74f",
];

pub const DARK_BACKGROUND: &str = "#111";
pub const LIGHT_BACKGROUND: &str = "#f0f0f0";
pub const DARK_LINK_COLOR: &str = "#ffffff";
pub const LIGHT_LINK_COLOR: &str = "#333333";

/// Marker color value asking the engine to pick per particle.
pub const RANDOM_COLOR: &str = "random";

pub const EMOJI: &[&str] = &[
    "🐎", "🐴", "🦄", "🦓", "🌀", "🛸", "👽", "👾", "🤖", "👨‍🚀", "🛰️", "⏳", "🧱", "📺", "🎶",
    "🎧", "🕺", "💃", "🥳", "🎉", "✨", "🌟", "💫", "🎆", "🎪", "🪩", "😎", "🔥", "🎡", "🌙",
    "🌈", "🌌", "🪐", "☄️", "🍄", "🌵", "🦋", "🐛", "🐸", "💎", "🔮", "🧿", "🧬", "🧪", "🎨",
    "🌺", "🌸", "🌲", "🐉", "🐙", "🦑", "🌊", "🧠", "💭", "⚡", "💥", "💧", "🧩", "👻", "🗿",
];

#[must_use]
pub fn color_palette(dark_mode: bool) -> &'static [&'static str] {
    if dark_mode {
        &DARK_PALETTE
    } else {
        &LIGHT_PALETTE
    }
}

#[must_use]
pub fn background_color(dark_mode: bool) -> &'static str {
    if dark_mode {
        DARK_BACKGROUND
    } else {
        LIGHT_BACKGROUND
    }
}

#[must_use]
pub fn link_color(dark_mode: bool) -> &'static str {
    if dark_mode {
        DARK_LINK_COLOR
    } else {
        LIGHT_LINK_COLOR
    }
}
