use burner_kernel::{DrawTarget, FrameStats, Registry};

/// Text shown by the stats toggle.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsOverlay;

impl StatsOverlay {
    pub fn text(stats: &FrameStats) -> String {
        format!("FPS: {} | Items: {}", stats.fps, stats.total_items)
    }

    /// Overlay text, or `None` while stats are toggled off.
    pub fn for_registry<T: DrawTarget>(registry: &Registry<T>) -> Option<String> {
        registry.stats().map(Self::text)
    }
}
