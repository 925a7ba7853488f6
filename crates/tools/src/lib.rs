//! Developer tooling: registry inspector and the stats overlay.
//!
//! # Invariants
//! - Tools only read the registry; they never mutate it.

pub mod inspector;
pub mod overlay;

pub use inspector::{ItemInfo, RegistryInspector, RegistrySummary};
pub use overlay::StatsOverlay;
