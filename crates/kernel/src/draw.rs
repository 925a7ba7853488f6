use burner_common::Rgb;
use glam::Vec2;

use crate::options::{BorderStyle, ColorMode, Visibility};

/// Border descriptor carried in a [`DrawProps`] bag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Border {
    pub width: f32,
    pub style: BorderStyle,
    /// `None` renders as transparent.
    pub color: Option<Rgb>,
    pub radius: f32,
}

/// Box shadow descriptor carried in a [`DrawProps`] bag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxShadow {
    pub offset: Vec2,
    pub blur: f32,
    pub spread: f32,
    /// `None` renders as transparent.
    pub color: Option<Rgb>,
}

/// Plain property bag handed to the render collaborator once per drawn
/// item or world per frame. Renderers must be idempotent given the same bag.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawProps {
    /// Stable element label, e.g. `Ball7`.
    pub label: String,
    /// Kind name, e.g. `Ball`, or `World`.
    pub name: String,
    /// Center of the visual.
    pub location: Vec2,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
    pub scale: f32,
    /// `None` renders as transparent.
    pub color: Option<Rgb>,
    pub color_mode: ColorMode,
    pub opacity: f32,
    pub visibility: Visibility,
    pub z_index: i32,
    pub border: Border,
    pub shadow: BoxShadow,
}

impl DrawProps {
    /// Top-left corner of the visual's box.
    pub fn top_left(&self) -> Vec2 {
        self.location - Vec2::new(self.width, self.height) / 2.0
    }
}

/// Render collaborator contract.
///
/// The registry calls `draw` during the draw phase and `hide` when an item
/// is retired. A target never sees mutable simulation state.
pub trait DrawTarget {
    /// Apply the visual representation described by `props`.
    fn draw(&mut self, props: &DrawProps);

    /// Neutralize the visual for `label`. A hidden element must not remain visible.
    fn hide(&mut self, label: &str);

    /// Drop every visual. Called on full teardown.
    fn clear(&mut self) {}
}

/// Target that discards everything. Useful for headless stepping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl DrawTarget for NullTarget {
    fn draw(&mut self, _props: &DrawProps) {}

    fn hide(&mut self, _label: &str) {}
}
