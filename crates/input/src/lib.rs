//! Input normalization: platform events in, registry calls out.
//!
//! # Invariants
//! - The registry never listens to platform events; everything arrives as an [`InputEvent`].
//! - Key codes are only interpreted through [`KeyBindings`], which callers may replace.

pub mod action;
pub mod bindings;
pub mod router;

pub use action::{Command, InputEvent};
pub use bindings::KeyBindings;
pub use router::{InputError, InputRouter};
