//! Burner kernel: items, worlds, and the registry that steps and draws them.
//!
//! The registry owns every world and item. Once per display frame the
//! embedding scheduler calls [`Registry::update`], which steps each item
//! against its world and then hands a [`DrawProps`] bag per item and world
//! to the [`DrawTarget`].
//!
//! # Invariants
//! - Items step in reverse insertion order, so retiring an item mid-pass
//!   never skips or double-steps another.
//! - Retired items are hidden and parked in their world's pool; recycling
//!   keeps the id and re-derives all other state.
//! - Configuration errors fail at construction time; query misses return
//!   `None` or an empty `Vec`.

pub mod draw;
pub mod error;
pub mod item;
pub mod kind;
pub mod options;
pub mod pointer;
pub mod registry;
pub mod scene;
pub mod stats;
pub mod world;

pub use draw::{Border, BoxShadow, DrawProps, DrawTarget, NullTarget};
pub use error::{ConfigError, RegistryError};
pub use item::{AttrValue, Item, StepOutcome};
pub use kind::{BallKind, BoxKind, ItemKind, KindFactory, KindRegistry, MoverKind, PlainKind};
pub use options::{BorderStyle, ColorMode, ItemOptions, Lifespan, Visibility, WorldOptions};
pub use pointer::Pointer;
pub use registry::{Registry, Scope, SetupFn};
pub use scene::{SceneConfig, SpawnSpec};
pub use stats::FrameStats;
pub use world::World;
