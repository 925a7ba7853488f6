use std::collections::BTreeMap;

use burner_common::Rgb;
use burner_kernel::{ColorMode, DrawProps, DrawTarget, Visibility};
use serde::{Deserialize, Serialize};

use crate::renderer::Renderer;

/// Host capabilities that decide how elements are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportedFeatures {
    pub css_transforms_3d: bool,
    pub css_transforms: bool,
}

impl SupportedFeatures {
    pub const ALL: Self = Self {
        css_transforms_3d: true,
        css_transforms: true,
    };
}

/// Style applied to a retired element so it cannot remain visible.
pub const HIDDEN_STYLE: &str = "visibility: hidden; top: -5000px; left: -5000px";

/// Keeps the current inline style per element label.
#[derive(Debug, Clone, Default)]
pub struct CssTextRenderer {
    features: SupportedFeatures,
    styles: BTreeMap<String, String>,
}

impl CssTextRenderer {
    pub fn new(features: SupportedFeatures) -> Self {
        Self {
            features,
            styles: BTreeMap::new(),
        }
    }

    pub fn features(&self) -> SupportedFeatures {
        self.features
    }

    /// Current style for `label`, if the element was ever drawn or hidden.
    pub fn style(&self, label: &str) -> Option<&str> {
        self.styles.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl DrawTarget for CssTextRenderer {
    fn draw(&mut self, props: &DrawProps) {
        let text = css_text(props, self.features);
        self.styles.insert(props.label.clone(), text);
    }

    fn hide(&mut self, label: &str) {
        self.styles.insert(label.to_string(), HIDDEN_STYLE.to_string());
    }

    fn clear(&mut self) {
        self.styles.clear();
    }
}

impl Renderer for CssTextRenderer {
    type Output = String;

    /// One `label { style }` rule per element, sorted by label.
    fn render(&self) -> String {
        let mut out = String::new();
        for (label, style) in &self.styles {
            out.push_str(&format!("#{label} {{ {style} }}\n"));
        }
        out
    }
}

fn color_css(color: Option<Rgb>, mode: ColorMode) -> String {
    match (color, mode) {
        (None, _) => "transparent".to_string(),
        (Some(Rgb(r, g, b)), ColorMode::Rgb) => format!("rgb({r}, {g}, {b})"),
        (Some(Rgb(h, s, l)), ColorMode::Hsl) => format!("hsl({h}, {s}%, {l}%)"),
    }
}

/// Inline CSS for one element.
///
/// Position uses `translate3d` when 3D transforms are supported, then
/// `translateX/Y`, and absolute `left`/`top` otherwise.
pub fn css_text(props: &DrawProps, features: SupportedFeatures) -> String {
    let corner = props.top_left();
    let (x, y) = (corner.x, corner.y);
    let turn = format!("rotate({}deg) scale({})", props.angle, props.scale);

    let position = if features.css_transforms_3d {
        format!("transform: translate3d({x}px, {y}px, 0) {turn}")
    } else if features.css_transforms {
        format!("transform: translateX({x}px) translateY({y}px) {turn}")
    } else {
        format!("position: absolute; left: {x}px; top: {y}px")
    };

    let visibility = match props.visibility {
        Visibility::Visible => "visible",
        Visibility::Hidden => "hidden",
    };

    let border = &props.border;
    let shadow = &props.shadow;
    let parts = [
        position,
        format!("width: {}px", props.width),
        format!("height: {}px", props.height),
        format!("background-color: {}", color_css(props.color, props.color_mode)),
        format!("opacity: {}", props.opacity),
        format!("visibility: {visibility}"),
        format!(
            "border: {}px {} {}",
            border.width,
            border.style.as_css(),
            color_css(border.color, ColorMode::Rgb)
        ),
        format!("border-radius: {}%", border.radius),
        format!(
            "box-shadow: {}px {}px {}px {}px {}",
            shadow.offset.x,
            shadow.offset.y,
            shadow.blur,
            shadow.spread,
            color_css(shadow.color, ColorMode::Rgb)
        ),
        format!("z-index: {}", props.z_index),
    ];
    parts.join("; ")
}
