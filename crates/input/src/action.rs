use burner_common::Viewport;
use serde::{Deserialize, Serialize};

/// A normalized event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Mouse position in viewport coordinates.
    PointerMoved { x: f32, y: f32 },
    /// First changed touch point, in viewport coordinates.
    TouchChanged { x: f32, y: f32 },
    /// The viewport changed size. Hosts should debounce these.
    Resized(Viewport),
    OrientationChanged(Viewport),
    /// Raw key code, resolved through [`crate::KeyBindings`].
    KeyPressed(u32),
}

/// A debug command the keyboard surface can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Command {
    /// Pause every world and advance exactly one frame.
    StepForward,
    /// Flip stepping and drawing on every world.
    TogglePause,
    /// Drop all items and re-run the setup hook.
    ResetSystem,
    /// Show or hide the frame-rate counter.
    ToggleStats,
}

impl Command {
    pub const ALL: [Self; 4] = [
        Self::StepForward,
        Self::TogglePause,
        Self::ResetSystem,
        Self::ToggleStats,
    ];
}
