use std::time::{Duration, Instant};

/// Frames-per-second counter shown by the stats toggle.
#[derive(Debug, Clone)]
pub struct FrameStats {
    /// Frames counted in the last complete one-second window.
    pub fps: u32,
    /// Frames counted in the current window.
    pub frame_count: u32,
    pub time_last_second: Instant,
    /// Active item count as of the last recorded frame.
    pub total_items: usize,
}

impl FrameStats {
    pub const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0,
            frame_count: 0,
            time_last_second: now,
            total_items: 0,
        }
    }

    /// Count one frame. When a full window has elapsed the count becomes the
    /// new `fps` and a new window starts at `now`.
    pub fn record_frame(&mut self, now: Instant, total_items: usize) {
        self.frame_count += 1;
        self.total_items = total_items;
        if now.saturating_duration_since(self.time_last_second) >= Self::WINDOW {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.time_last_second = now;
        }
    }
}
