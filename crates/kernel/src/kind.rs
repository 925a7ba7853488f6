//! Item kinds: the behavior variants the registry can instantiate by name.
//!
//! A kind is a small object paired with each [`Item`]. It runs after
//! [`Item::reset`] to apply its own defaults and may override stepping,
//! drawing, or attribute lookup. New kinds are added by registering a
//! factory with [`KindRegistry::register`].

use std::collections::BTreeMap;
use std::fmt;

use burner_common::{EdgeMask, Rgb};

use crate::draw::DrawProps;
use crate::item::{AttrValue, Item, StepOutcome};
use crate::options::ItemOptions;
use crate::world::World;

/// Behavior shared by every item kind.
pub trait ItemKind: fmt::Debug {
    /// Kind-specific defaults, applied after the item was reset from `options`.
    /// Only fields the options left unset should be touched.
    fn init(&mut self, _item: &mut Item, _options: &ItemOptions) {}

    fn step(&mut self, item: &mut Item, world: &mut World) -> StepOutcome {
        item.step(world)
    }

    fn draw_props(&self, item: &Item) -> DrawProps {
        item.draw_props()
    }

    /// Extra attributes beyond the ones every [`Item`] exposes.
    fn attribute(&self, _key: &str) -> Option<AttrValue> {
        None
    }
}

/// Constructor for a fresh kind instance.
pub type KindFactory = Box<dyn Fn() -> Box<dyn ItemKind>>;

/// Name-to-factory map consulted by `Registry::add`.
pub struct KindRegistry {
    factories: BTreeMap<String, KindFactory>,
}

impl KindRegistry {
    /// An empty map. `Registry::add` will fail for every name until kinds are registered.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The built-in kinds: `Item`, `Ball`, `Box`, and `Mover`.
    pub fn with_builtins() -> Self {
        let mut kinds = Self::empty();
        kinds.register(PlainKind::NAME, || Box::new(PlainKind));
        kinds.register(BallKind::NAME, || Box::new(BallKind));
        kinds.register(BoxKind::NAME, || Box::new(BoxKind));
        kinds.register(MoverKind::NAME, || Box::new(MoverKind));
        kinds
    }

    /// Register (or replace) the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn ItemKind> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn create(&self, name: &str) -> Option<Box<dyn ItemKind>> {
        self.factories.get(name).map(|f| f())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A plain item with no extra behavior.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainKind;

impl PlainKind {
    pub const NAME: &'static str = "Item";
}

impl ItemKind for PlainKind {}

/// Round body with a drop shadow.
#[derive(Debug, Default, Clone, Copy)]
pub struct BallKind;

impl BallKind {
    pub const NAME: &'static str = "Ball";
}

impl ItemKind for BallKind {
    fn init(&mut self, item: &mut Item, options: &ItemOptions) {
        if options.width.is_none() {
            item.width = 20.0;
        }
        if options.height.is_none() {
            item.height = 20.0;
        }
        if options.border_radius.is_none() {
            item.border_radius = 100.0;
        }
        if options.box_shadow_color.is_none() {
            item.box_shadow_color = Some(Rgb::BLACK);
        }
    }
}

/// Square grey body.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoxKind;

impl BoxKind {
    pub const NAME: &'static str = "Box";
}

impl ItemKind for BoxKind {
    fn init(&mut self, item: &mut Item, options: &ItemOptions) {
        if options.width.is_none() {
            item.width = 20.0;
        }
        if options.height.is_none() {
            item.height = 20.0;
        }
        if options.color.is_none() {
            item.color = Rgb(100, 100, 100);
        }
        if options.border_radius.is_none() {
            item.border_radius = 0.0;
        }
    }
}

/// Body that only collides with the floor and keeps most of its energy.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoverKind;

impl MoverKind {
    pub const NAME: &'static str = "Mover";
    pub const BOUNCINESS: f32 = 0.9;
}

impl ItemKind for MoverKind {
    fn init(&mut self, item: &mut Item, options: &ItemOptions) {
        if options.world_bounds.is_none() {
            item.world_bounds = EdgeMask {
                bottom: true,
                ..EdgeMask::NONE
            };
        }
        if options.bounciness.is_none() {
            item.bounciness = Self::BOUNCINESS;
        }
    }
}
