use std::collections::BTreeMap;

use burner_kernel::{DrawProps, DrawTarget, Visibility};

/// A draw target that can produce output for the current frame.
pub trait Renderer: DrawTarget {
    /// The output type produced by this renderer.
    type Output;

    /// Output for everything currently drawn.
    fn render(&self) -> Self::Output;
}

/// Human-readable frame dump.
///
/// Keeps one line per visible element, keyed by label. Useful for CLI
/// output, logging, and testing the draw contract.
#[derive(Debug, Default, Clone)]
pub struct DebugTextRenderer {
    lines: BTreeMap<String, String>,
    draws: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `draw` calls received.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn line(&self, label: &str) -> Option<&str> {
        self.lines.get(label).map(String::as_str)
    }
}

impl DrawTarget for DebugTextRenderer {
    fn draw(&mut self, props: &DrawProps) {
        self.draws += 1;
        if props.visibility == Visibility::Hidden {
            self.lines.remove(&props.label);
            return;
        }
        let line = format!(
            "[{}] {} pos=({:.2}, {:.2}) size={:.0}x{:.0} angle={:.1}",
            props.label,
            props.name,
            props.location.x,
            props.location.y,
            props.width,
            props.height,
            props.angle
        );
        self.lines.insert(props.label.clone(), line);
    }

    fn hide(&mut self, label: &str) {
        tracing::trace!(label, "element hidden");
        self.lines.remove(label);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self) -> String {
        let mut out = format!("=== Frame (elements={}) ===\n", self.lines.len());
        for line in self.lines.values() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burner_common::Viewport;
    use burner_kernel::{ItemOptions, Registry, WorldOptions};
    use glam::Vec2;

    fn registry() -> Registry<DebugTextRenderer> {
        let mut r = Registry::new(DebugTextRenderer::new(), Viewport::new(200.0, 200.0)).unwrap();
        r.create(&[WorldOptions::sized(200.0, 200.0)], |_| Ok(()), true)
            .unwrap();
        r
    }

    #[test]
    fn empty_frame() {
        let r = DebugTextRenderer::new();
        let output = r.render();
        assert!(output.contains("elements=0"));
    }

    #[test]
    fn frame_lists_items_and_worlds() {
        let mut r = registry();
        r.add(
            "Ball",
            &ItemOptions {
                location: Some(Vec2::new(1.0, 2.0)),
                is_static: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        r.update();

        let output = r.target().render();
        assert!(output.contains("elements=2"));
        assert!(output.contains("[Ball2] Ball pos=(1.00, 2.00) size=20x20"));
        assert!(output.contains("[World1] World"));
        assert_eq!(r.target().draws(), 2);
    }

    #[test]
    fn retired_items_leave_the_frame() {
        let mut r = registry();
        let id = r.add("Item", &ItemOptions::default()).unwrap();
        r.update();
        assert!(r.target().line("Item2").is_some());
        r.remove(id);
        assert!(r.target().line("Item2").is_none());
        r.update();
        assert!(!r.target().render().contains("Item2"));
    }
}
