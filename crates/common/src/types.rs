use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial identifier for an item.
///
/// Issued by the registry from a single monotonically increasing counter.
/// A pooled item keeps its id when it is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// Serial identifier for a world. Shares the item counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Axis-aligned rectangle in world space.
///
/// # Invariants
/// - `right >= left` and `bottom >= top`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Bounds {
    /// Bounds anchored at the origin with the given extent.
    /// Negative extents collapse to zero.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            top: 0.0,
            right: width.max(0.0),
            bottom: height.max(0.0),
            left: 0.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// True if `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_size(0.0, 0.0)
    }
}

/// Per-edge enable mask, in `(top, right, bottom, left)` order.
///
/// Serialized as a four-element bool array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[bool; 4]", into = "[bool; 4]")]
pub struct EdgeMask {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl EdgeMask {
    pub const ALL: Self = Self {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub const NONE: Self = Self {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };
}

impl Default for EdgeMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<[bool; 4]> for EdgeMask {
    fn from([top, right, bottom, left]: [bool; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl From<EdgeMask> for [bool; 4] {
    fn from(m: EdgeMask) -> Self {
        [m.top, m.right, m.bottom, m.left]
    }
}

/// 8-bit RGB color triple. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
}

/// Size of the host viewport the worlds are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// A viewport is usable when both dimensions are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
