//! Typed configuration for items and worlds.
//!
//! Every field is optional; `None` means "use the documented default" when
//! passed to a reset, and "leave unchanged" when passed as an update patch.
//! Unknown fields are rejected when deserializing.

use burner_common::{EdgeMask, Rgb, WorldId};
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f32 = 10.0;
pub const DEFAULT_HEIGHT: f32 = 10.0;
pub const DEFAULT_MASS: f32 = 10.0;
pub const DEFAULT_BOUNCINESS: f32 = 0.8;
pub const DEFAULT_MAX_SPEED: f32 = 10.0;
pub const DEFAULT_AVOID_STRENGTH: f32 = 50.0;

/// How long an item lives, in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifespan {
    #[default]
    Infinite,
    Frames(u32),
}

impl Lifespan {
    /// Convert the integer form used in configuration: any negative value
    /// (conventionally `-1`) means infinite.
    pub fn from_frames(frames: i64) -> Self {
        match u32::try_from(frames) {
            Ok(n) => Self::Frames(n),
            Err(_) if frames < 0 => Self::Infinite,
            Err(_) => Self::Frames(u32::MAX),
        }
    }

    /// Integer form: `-1` for infinite.
    pub fn as_frames(&self) -> i64 {
        match self {
            Self::Infinite => -1,
            Self::Frames(n) => i64::from(*n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Rgb,
    Hsl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Double => "double",
        }
    }
}

/// Options for resetting or patching an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemOptions {
    /// Owning world. Only consulted by `Registry::add`; defaults to the first world.
    pub world: Option<WorldId>,

    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Option<Rgb>,
    pub color_mode: Option<ColorMode>,
    pub visibility: Option<Visibility>,
    pub opacity: Option<f32>,
    pub z_index: Option<i32>,
    pub border_width: Option<f32>,
    pub border_style: Option<BorderStyle>,
    pub border_color: Option<Rgb>,
    pub border_radius: Option<f32>,
    pub box_shadow_offset: Option<Vec2>,
    pub box_shadow_blur: Option<f32>,
    pub box_shadow_spread: Option<f32>,
    pub box_shadow_color: Option<Rgb>,

    pub bounciness: Option<f32>,
    /// Must be positive.
    pub mass: Option<f32>,
    pub acceleration: Option<Vec2>,
    pub velocity: Option<Vec2>,
    /// Defaults to the center of the owning world.
    pub location: Option<Vec2>,
    pub max_speed: Option<f32>,
    pub min_speed: Option<f32>,
    pub angle: Option<f32>,
    pub scale: Option<f32>,

    /// Negative means infinite.
    pub lifespan: Option<i64>,
    pub life: Option<u32>,

    pub is_static: Option<bool>,
    pub check_world_edges: Option<bool>,
    pub wrap_world_edges: Option<bool>,
    pub wrap_world_edges_soft: Option<bool>,
    pub control_camera: Option<bool>,
    pub world_bounds: Option<EdgeMask>,
    pub avoid_world_edges: Option<bool>,
    pub avoid_world_edges_strength: Option<f32>,
}

/// Options for constructing a world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldOptions {
    /// Explicit width; ignored while bound to the window.
    pub width: Option<f32>,
    /// Explicit height; ignored while bound to the window.
    pub height: Option<f32>,
    /// Defaults to `(0, 1)`.
    pub gravity: Option<Vec2>,
    /// Drag coefficient; `0` disables drag.
    pub drag: Option<f32>,
    /// Defaults to `true`.
    pub bound_to_window: Option<bool>,
    pub location: Option<Vec2>,
    pub pause_step: Option<bool>,
    pub pause_draw: Option<bool>,
    pub color: Option<Rgb>,
}

impl WorldOptions {
    /// A world with explicit dimensions, detached from the viewport.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            bound_to_window: Some(false),
            ..Default::default()
        }
    }
}
