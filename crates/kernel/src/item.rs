use burner_common::{limit, Bounds, EdgeMask, ItemId, Rgb, WorldId};
use glam::Vec2;

use crate::draw::{Border, BoxShadow, DrawProps};
use crate::options::{
    BorderStyle, ColorMode, ItemOptions, Lifespan, Visibility, DEFAULT_AVOID_STRENGTH,
    DEFAULT_BOUNCINESS, DEFAULT_HEIGHT, DEFAULT_MASS, DEFAULT_MAX_SPEED, DEFAULT_WIDTH,
};
use crate::world::World;

/// What the registry should do with an item after it stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Lifespan elapsed; move the item to its world's pool.
    Retire,
}

/// A queryable attribute value, see [`Item::attribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Vector(Vec2),
    Color(Rgb),
}

impl AttrValue {
    /// Equality for query filters. Item fields are `f32`, so numbers that
    /// differ only past `f32` precision still match.
    pub fn matches(&self, want: &AttrValue) -> bool {
        match (self, want) {
            (Self::Number(a), Self::Number(b)) => a == b || *a as f32 == *b as f32,
            _ => self == want,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec2> for AttrValue {
    fn from(v: Vec2) -> Self {
        Self::Vector(v)
    }
}

impl From<Rgb> for AttrValue {
    fn from(v: Rgb) -> Self {
        Self::Color(v)
    }
}

/// A simulated body: the per-frame physics state machine.
///
/// Items are Active while in the registry's record list and Retired while
/// parked in their world's pool. [`Item::reset`] re-derives every field and
/// is how a retired item becomes active again.
///
/// # Invariants
/// - `mass > 0` (precondition, not checked).
/// - `life <= lifespan` while the lifespan is finite; reaching it retires the item.
/// - `acceleration` is zero between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: ItemId,
    name: String,
    world: WorldId,

    pub width: f32,
    pub height: f32,
    pub color: Rgb,
    pub color_mode: ColorMode,
    pub visibility: Visibility,
    pub opacity: f32,
    pub z_index: i32,
    pub border_width: f32,
    pub border_style: BorderStyle,
    pub border_color: Option<Rgb>,
    pub border_radius: f32,
    pub box_shadow_offset: Vec2,
    pub box_shadow_blur: f32,
    pub box_shadow_spread: f32,
    pub box_shadow_color: Option<Rgb>,

    pub bounciness: f32,
    pub mass: f32,
    pub acceleration: Vec2,
    pub velocity: Vec2,
    pub location: Vec2,
    pub init_location: Vec2,
    pub max_speed: f32,
    pub min_speed: f32,
    pub angle: f32,
    pub scale: f32,

    pub lifespan: Lifespan,
    pub life: u32,

    pub is_static: bool,
    pub check_world_edges: bool,
    pub wrap_world_edges: bool,
    pub wrap_world_edges_soft: bool,
    pub control_camera: bool,
    pub world_bounds: EdgeMask,
    pub avoid_world_edges: bool,
    pub avoid_world_edges_strength: f32,
}

impl Item {
    /// Construct an item owned by `world` and reset it from `options`.
    pub fn new(id: ItemId, name: impl Into<String>, world: &World, options: &ItemOptions) -> Self {
        let mut item = Self {
            id,
            name: name.into(),
            world: world.id(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color: Rgb::BLACK,
            color_mode: ColorMode::Rgb,
            visibility: Visibility::Visible,
            opacity: 1.0,
            z_index: 1,
            border_width: 0.0,
            border_style: BorderStyle::None,
            border_color: None,
            border_radius: 0.0,
            box_shadow_offset: Vec2::ZERO,
            box_shadow_blur: 0.0,
            box_shadow_spread: 0.0,
            box_shadow_color: None,
            bounciness: DEFAULT_BOUNCINESS,
            mass: DEFAULT_MASS,
            acceleration: Vec2::ZERO,
            velocity: Vec2::ZERO,
            location: Vec2::ZERO,
            init_location: Vec2::ZERO,
            max_speed: DEFAULT_MAX_SPEED,
            min_speed: 0.0,
            angle: 0.0,
            scale: 1.0,
            lifespan: Lifespan::Infinite,
            life: 0,
            is_static: false,
            check_world_edges: true,
            wrap_world_edges: false,
            wrap_world_edges_soft: false,
            control_camera: false,
            world_bounds: EdgeMask::ALL,
            avoid_world_edges: false,
            avoid_world_edges_strength: DEFAULT_AVOID_STRENGTH,
        };
        item.reset(options, world);
        item
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    /// Element label: name followed by the serial, e.g. `Item5`.
    pub fn label(&self) -> String {
        format!("{}{}", self.name, self.id)
    }

    /// Re-derive every field from `options`, falling back to defaults.
    ///
    /// Identity (`id`, `name`, `world`) is preserved. Idempotent for equal inputs.
    pub fn reset(&mut self, options: &ItemOptions, world: &World) {
        let o = options;
        self.width = o.width.unwrap_or(DEFAULT_WIDTH);
        self.height = o.height.unwrap_or(DEFAULT_HEIGHT);
        self.color = o.color.unwrap_or(Rgb::BLACK);
        self.color_mode = o.color_mode.unwrap_or_default();
        self.visibility = o.visibility.unwrap_or_default();
        self.opacity = o.opacity.unwrap_or(1.0);
        self.z_index = o.z_index.unwrap_or(1);
        self.border_width = o.border_width.unwrap_or(0.0);
        self.border_style = o.border_style.unwrap_or_default();
        self.border_color = o.border_color;
        self.border_radius = o.border_radius.unwrap_or(0.0);
        self.box_shadow_offset = o.box_shadow_offset.unwrap_or(Vec2::ZERO);
        self.box_shadow_blur = o.box_shadow_blur.unwrap_or(0.0);
        self.box_shadow_spread = o.box_shadow_spread.unwrap_or(0.0);
        self.box_shadow_color = o.box_shadow_color;

        self.bounciness = o.bounciness.unwrap_or(DEFAULT_BOUNCINESS);
        self.mass = o.mass.unwrap_or(DEFAULT_MASS);
        self.acceleration = o.acceleration.unwrap_or(Vec2::ZERO);
        self.velocity = o.velocity.unwrap_or(Vec2::ZERO);
        self.location = o.location.unwrap_or_else(|| world.bounds().center());
        self.init_location = self.location;
        self.max_speed = o.max_speed.unwrap_or(DEFAULT_MAX_SPEED);
        self.min_speed = o.min_speed.unwrap_or(0.0);
        self.angle = o.angle.unwrap_or(0.0);
        self.scale = o.scale.unwrap_or(1.0);

        self.lifespan = o.lifespan.map_or(Lifespan::Infinite, Lifespan::from_frames);
        self.life = o.life.unwrap_or(0);

        self.is_static = o.is_static.unwrap_or(false);
        self.check_world_edges = o.check_world_edges.unwrap_or(true);
        self.wrap_world_edges = o.wrap_world_edges.unwrap_or(false);
        self.wrap_world_edges_soft = o.wrap_world_edges_soft.unwrap_or(false);
        self.control_camera = o.control_camera.unwrap_or(false);
        self.world_bounds = o.world_bounds.unwrap_or(EdgeMask::ALL);
        self.avoid_world_edges = o.avoid_world_edges.unwrap_or(false);
        self.avoid_world_edges_strength = o
            .avoid_world_edges_strength
            .unwrap_or(DEFAULT_AVOID_STRENGTH);
    }

    /// Overwrite only the fields present in `patch`. The owning world never changes.
    pub fn apply(&mut self, patch: &ItemOptions) {
        macro_rules! take {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = patch.$field {
                    self.$field = v;
                })*
            };
        }
        take!(
            width, height, color, color_mode, visibility, opacity, z_index, border_width,
            border_style, border_radius, box_shadow_offset, box_shadow_blur, box_shadow_spread,
            bounciness, mass, acceleration, velocity, location, max_speed, min_speed, angle,
            scale, life, is_static, check_world_edges, wrap_world_edges, wrap_world_edges_soft,
            control_camera, world_bounds, avoid_world_edges, avoid_world_edges_strength,
        );
        if patch.border_color.is_some() {
            self.border_color = patch.border_color;
        }
        if patch.box_shadow_color.is_some() {
            self.box_shadow_color = patch.box_shadow_color;
        }
        if let Some(frames) = patch.lifespan {
            self.lifespan = Lifespan::from_frames(frames);
        }
    }

    /// Accumulate `force / mass` into the acceleration and return it.
    ///
    /// Non-finite forces are ignored and yield `None`.
    pub fn apply_force(&mut self, force: Vec2) -> Option<Vec2> {
        if !force.is_finite() {
            return None;
        }
        self.acceleration += force / self.mass;
        Some(self.acceleration)
    }

    /// Advance one frame against `world`.
    ///
    /// Order: gravity, drag, edge avoidance, integrate velocity (speed
    /// limited), integrate location, camera, edge policy, clear
    /// acceleration, lifespan bookkeeping. Static items do nothing.
    pub fn step(&mut self, world: &mut World) -> StepOutcome {
        if self.is_static {
            return StepOutcome::Continue;
        }

        self.apply_force(world.gravity);
        if world.drag != 0.0 {
            let drag = -self.velocity.normalize_or_zero() * world.drag;
            self.apply_force(drag);
        }
        if self.avoid_world_edges {
            let steer = self.edge_avoidance(world.bounds());
            self.apply_force(steer);
        }

        self.velocity += self.acceleration;
        self.velocity = limit(self.velocity, self.max_speed, self.min_speed);
        self.location += self.velocity;

        if self.control_camera {
            world.location -= self.velocity;
        }
        self.check_world_edges(world);

        self.acceleration = Vec2::ZERO;

        match self.lifespan {
            Lifespan::Infinite => StepOutcome::Continue,
            Lifespan::Frames(n) if self.life < n => {
                self.life += 1;
                StepOutcome::Continue
            }
            Lifespan::Frames(_) => StepOutcome::Retire,
        }
    }

    /// Apply the configured edge policy. Soft wrap takes precedence over
    /// wrap, which takes precedence over bounce.
    pub fn check_world_edges(&mut self, world: &mut World) {
        let bounds = world.bounds();
        let before = self.location;

        if self.wrap_world_edges_soft {
            self.location.x = soft_wrap(self.location.x, bounds.left, bounds.right);
            self.location.y = soft_wrap(self.location.y, bounds.top, bounds.bottom);
        } else if self.wrap_world_edges {
            self.location.x = hard_wrap(self.location.x, bounds.left, bounds.right);
            self.location.y = hard_wrap(self.location.y, bounds.top, bounds.bottom);
        } else {
            if self.check_world_edges {
                self.bounce(bounds);
            }
            return;
        }

        if self.control_camera {
            world.location += before - self.location;
        }
    }

    /// Clamp the item's box inside `bounds`, reflecting and damping the
    /// velocity component on each enabled edge that was crossed.
    fn bounce(&mut self, bounds: Bounds) {
        let half = Vec2::new(self.width, self.height) / 2.0;
        let mask = self.world_bounds;

        if self.location.x + half.x > bounds.right && mask.right {
            self.location.x = bounds.right - half.x;
            self.velocity.x *= -self.bounciness;
        } else if self.location.x - half.x < bounds.left && mask.left {
            self.location.x = bounds.left + half.x;
            self.velocity.x *= -self.bounciness;
        }

        if self.location.y + half.y > bounds.bottom && mask.bottom {
            self.location.y = bounds.bottom - half.y;
            self.velocity.y *= -self.bounciness;
        } else if self.location.y - half.y < bounds.top && mask.top {
            self.location.y = bounds.top + half.y;
            self.velocity.y *= -self.bounciness;
        }
    }

    /// Steering force away from enabled edges closer than the avoid strength.
    fn edge_avoidance(&self, bounds: Bounds) -> Vec2 {
        let reach = self.avoid_world_edges_strength;
        if reach <= 0.0 {
            return Vec2::ZERO;
        }
        let push = |distance: f32| ((reach - distance) / reach).clamp(0.0, 1.0);
        let mask = self.world_bounds;
        let mut steer = Vec2::ZERO;
        if mask.left {
            steer.x += push(self.location.x - bounds.left);
        }
        if mask.right {
            steer.x -= push(bounds.right - self.location.x);
        }
        if mask.top {
            steer.y += push(self.location.y - bounds.top);
        }
        if mask.bottom {
            steer.y -= push(bounds.bottom - self.location.y);
        }
        steer * self.max_speed
    }

    /// Look up a field by its snake_case name.
    pub fn attribute(&self, key: &str) -> Option<AttrValue> {
        let value = match key {
            "id" => AttrValue::Number(self.id.0 as f64),
            "name" => self.name.as_str().into(),
            "label" => AttrValue::Text(self.label()),
            "width" => self.width.into(),
            "height" => self.height.into(),
            "color" => self.color.into(),
            "opacity" => self.opacity.into(),
            "z_index" => self.z_index.into(),
            "visibility" => AttrValue::Bool(self.visibility == Visibility::Visible),
            "border_width" => self.border_width.into(),
            "border_radius" => self.border_radius.into(),
            "bounciness" => self.bounciness.into(),
            "mass" => self.mass.into(),
            "acceleration" => self.acceleration.into(),
            "velocity" => self.velocity.into(),
            "location" => self.location.into(),
            "max_speed" => self.max_speed.into(),
            "min_speed" => self.min_speed.into(),
            "angle" => self.angle.into(),
            "scale" => self.scale.into(),
            "lifespan" => self.lifespan.as_frames().into(),
            "life" => i64::from(self.life).into(),
            "is_static" => self.is_static.into(),
            "check_world_edges" => self.check_world_edges.into(),
            "wrap_world_edges" => self.wrap_world_edges.into(),
            "wrap_world_edges_soft" => self.wrap_world_edges_soft.into(),
            "control_camera" => self.control_camera.into(),
            "avoid_world_edges" => self.avoid_world_edges.into(),
            "avoid_world_edges_strength" => self.avoid_world_edges_strength.into(),
            _ => return None,
        };
        Some(value)
    }

    /// Property bag for the render collaborator.
    pub fn draw_props(&self) -> DrawProps {
        DrawProps {
            label: self.label(),
            name: self.name.clone(),
            location: self.location,
            width: self.width,
            height: self.height,
            angle: self.angle,
            scale: self.scale,
            color: Some(self.color),
            color_mode: self.color_mode,
            opacity: self.opacity,
            visibility: self.visibility,
            z_index: self.z_index,
            border: Border {
                width: self.border_width,
                style: self.border_style,
                color: self.border_color,
                radius: self.border_radius,
            },
            shadow: BoxShadow {
                offset: self.box_shadow_offset,
                blur: self.box_shadow_blur,
                spread: self.box_shadow_spread,
                color: self.box_shadow_color,
            },
        }
    }
}

/// Snap a center coordinate that left `[lo, hi]` to the opposite boundary.
fn hard_wrap(v: f32, lo: f32, hi: f32) -> f32 {
    if v > hi {
        lo
    } else if v < lo {
        hi
    } else {
        v
    }
}

/// Reinsert a center coordinate that left `[lo, hi]` on the opposite side,
/// carrying the overshoot.
fn soft_wrap(v: f32, lo: f32, hi: f32) -> f32 {
    let span = hi - lo;
    if v >= lo && v <= hi {
        return v;
    }
    if span <= 0.0 {
        return lo;
    }
    lo + (v - lo).rem_euclid(span)
}
