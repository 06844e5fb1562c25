//! Geometry types shared by the positioning engine and the surfaces.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Snapshot of an element's on-screen rectangle.
///
/// Used as the trigger geometry when positioning anchored surfaces. Taken
/// fresh on every open and reposition, never cached across opens.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Builds a rectangle from its origin and size.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }
}

/// Anchor point produced by the positioning engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Size of a surface, used to turn an anchor point into an origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Visible area of the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Side of the trigger (or of the viewport, for edge surfaces).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Returns true for top and bottom.
    pub fn is_vertical(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Top => "top",
            Side::Bottom => "bottom",
            Side::Left => "left",
            Side::Right => "right",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Side {
    type Err = Infallible;

    /// Unknown names fall back to `top`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            other => {
                tracing::warn!(value = other, "unknown side, using top");
                Side::default()
            }
        })
    }
}

/// Alignment along the trigger edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

impl FromStr for Align {
    type Err = Infallible;

    /// Unknown names fall back to `center`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "start" => Align::Start,
            "center" => Align::Center,
            "end" => Align::End,
            other => {
                tracing::warn!(value = other, "unknown alignment, using center");
                Align::default()
            }
        })
    }
}

/// Where an anchored surface sits relative to its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
}

impl Placement {
    pub fn new(side: Side, align: Align) -> Self {
        Self { side, align }
    }
}

/// Size preset for sheets, drawers and alert dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceSize {
    Sm,
    #[default]
    Md,
    Lg,
    Full,
}

impl FromStr for SurfaceSize {
    type Err = Infallible;

    /// Unknown names fall back to `md`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "sm" => SurfaceSize::Sm,
            "md" => SurfaceSize::Md,
            "lg" => SurfaceSize::Lg,
            "full" => SurfaceSize::Full,
            other => {
                tracing::warn!(value = other, "unknown surface size, using md");
                SurfaceSize::default()
            }
        })
    }
}
