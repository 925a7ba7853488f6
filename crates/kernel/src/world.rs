use burner_common::{Bounds, Rgb, Viewport, WorldId};
use glam::Vec2;

use crate::draw::{Border, BoxShadow, DrawProps};
use crate::error::ConfigError;
use crate::options::{ColorMode, Visibility, WorldOptions};

/// Index of an item's slot in the registry arena.
pub(crate) type Slot = usize;

/// A rectangular simulation boundary.
///
/// Owns gravity, drag, the pause toggles, and a pool of retired items
/// awaiting reuse. Items refer to their world by [`WorldId`].
///
/// # Invariants
/// - `bounds.right >= bounds.left` and `bounds.bottom >= bounds.top`.
/// - `location` is anchored at most once by [`World::set_bounds`].
#[derive(Debug, Clone)]
pub struct World {
    id: WorldId,
    width: f32,
    height: f32,
    bounds: Bounds,
    anchored: bool,
    pub(crate) pool: Vec<Slot>,

    pub gravity: Vec2,
    /// Drag coefficient; `0` disables drag.
    pub drag: f32,
    pub bound_to_window: bool,
    /// Skip the step phase for this world's items.
    pub pause_step: bool,
    /// Skip the draw phase for this world and its items.
    pub pause_draw: bool,
    /// Scroll position. Camera-controlling items move it.
    pub location: Vec2,
    pub color: Option<Rgb>,
}

impl World {
    pub const NAME: &'static str = "World";

    /// Build a world and establish its bounds against `viewport`.
    pub fn new(id: WorldId, options: &WorldOptions, viewport: Viewport) -> Result<Self, ConfigError> {
        if !viewport.is_valid() {
            return Err(ConfigError::viewport(viewport));
        }
        let width = options.width.unwrap_or(0.0);
        let height = options.height.unwrap_or(0.0);
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(ConfigError::InvalidWorldSize { width, height });
        }

        let mut world = Self {
            id,
            width,
            height,
            bounds: Bounds::default(),
            anchored: options.location.is_some(),
            pool: Vec::new(),
            gravity: options.gravity.unwrap_or(Vec2::new(0.0, 1.0)),
            drag: options.drag.unwrap_or(0.0),
            bound_to_window: options.bound_to_window.unwrap_or(true),
            pause_step: options.pause_step.unwrap_or(false),
            pause_draw: options.pause_draw.unwrap_or(false),
            location: options.location.unwrap_or(Vec2::ZERO),
            color: options.color,
        };
        world.set_bounds(viewport);
        Ok(world)
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn name(&self) -> &str {
        Self::NAME
    }

    /// Element label, e.g. `World1`.
    pub fn label(&self) -> String {
        format!("{}{}", Self::NAME, self.id)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of retired items waiting in this world's pool.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Recompute bounds from the viewport (when bound to the window) or from
    /// the explicit size. Safe to call on every resize; the location is only
    /// anchored to the viewport center the first time.
    pub fn set_bounds(&mut self, viewport: Viewport) {
        if self.bound_to_window {
            self.width = viewport.width;
            self.height = viewport.height;
        }
        self.bounds = Bounds::from_size(self.width, self.height);

        if !self.anchored {
            self.location = viewport.center();
            self.anchored = true;
        }
    }

    /// Property bag for the render collaborator.
    pub fn draw_props(&self) -> DrawProps {
        DrawProps {
            label: self.label(),
            name: Self::NAME.to_string(),
            location: self.location,
            width: self.width,
            height: self.height,
            angle: 0.0,
            scale: 1.0,
            color: self.color,
            color_mode: ColorMode::Rgb,
            opacity: 1.0,
            visibility: Visibility::Visible,
            z_index: 0,
            border: Border::default(),
            shadow: BoxShadow::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_to_window_by_default() {
        let w = World::new(WorldId(1), &WorldOptions::default(), Viewport::new(640.0, 480.0)).unwrap();
        assert!(w.bound_to_window);
        assert_eq!(w.bounds(), Bounds::from_size(640.0, 480.0));
        assert_eq!(w.gravity, Vec2::new(0.0, 1.0));
        assert_eq!(w.drag, 0.0);
        assert_eq!(w.label(), "World1");
    }

    #[test]
    fn explicit_size_when_detached() {
        let w = World::new(WorldId(1), &WorldOptions::sized(400.0, 300.0), Viewport::new(1024.0, 768.0)).unwrap();
        assert_eq!(w.bounds().right, 400.0);
        assert_eq!(w.bounds().bottom, 300.0);
    }

    #[test]
    fn location_anchors_only_once() {
        let mut w = World::new(WorldId(1), &WorldOptions::default(), Viewport::new(200.0, 100.0)).unwrap();
        assert_eq!(w.location, Vec2::new(100.0, 50.0));
        w.location = Vec2::new(3.0, 4.0);
        w.set_bounds(Viewport::new(400.0, 200.0));
        assert_eq!(w.location, Vec2::new(3.0, 4.0));
        assert_eq!(w.bounds().right, 400.0);
    }

    #[test]
    fn explicit_location_is_kept() {
        let opts = WorldOptions {
            location: Some(Vec2::new(7.0, 8.0)),
            ..Default::default()
        };
        let w = World::new(WorldId(1), &opts, Viewport::new(200.0, 100.0)).unwrap();
        assert_eq!(w.location, Vec2::new(7.0, 8.0));
    }

    #[test]
    fn invalid_viewport_is_fatal() {
        let res = World::new(WorldId(1), &WorldOptions::default(), Viewport::new(-1.0, 10.0));
        assert!(matches!(res, Err(ConfigError::InvalidViewport { .. })));
    }

    #[test]
    fn invalid_size_is_fatal() {
        let res = World::new(WorldId(1), &WorldOptions::sized(f32::INFINITY, 10.0), Viewport::default());
        assert!(matches!(res, Err(ConfigError::InvalidWorldSize { .. })));
    }
}
