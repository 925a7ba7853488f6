//! Render collaborators: turn kernel property bags into output.
//!
//! # Invariants
//! - Renderers never see or mutate simulation state, only [`DrawProps`] bags.
//! - Drawing the same bag twice yields the same output.
//! - A hidden element produces no visible output.
//!
//! [`DrawProps`]: burner_kernel::DrawProps

mod css;
mod renderer;

pub use css::{CssTextRenderer, HIDDEN_STYLE, SupportedFeatures, css_text};
pub use renderer::{DebugTextRenderer, Renderer};
