//! Shared types and small numeric helpers used by every burner crate.
//!
//! The 2D vector type is [`glam::Vec2`]; this crate only adds the few
//! operations the engine needs that glam does not provide in the exact form
//! required (speed limiting with a floor, range remapping).

pub mod math;
pub mod types;

pub use glam::Vec2;
pub use math::{limit, map_range};
pub use types::{Bounds, EdgeMask, ItemId, Rgb, Viewport, WorldId};
