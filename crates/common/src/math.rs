use glam::Vec2;

/// Clamp the magnitude of `v` into `[min, max]`.
///
/// A zero vector is returned unchanged: it has no direction to scale along,
/// so a positive `min` cannot be honored.
pub fn limit(v: Vec2, max: f32, min: f32) -> Vec2 {
    let len = v.length();
    if len == 0.0 || !len.is_finite() {
        return v;
    }
    if len > max {
        v * (max / len)
    } else if len < min {
        v * (min / len)
    } else {
        v
    }
}

/// Re-map `value` from the range `[min1, max1]` into `[min2, max2]`.
///
/// A degenerate source range maps everything onto `min2`.
pub fn map_range(value: f32, min1: f32, max1: f32, min2: f32, max2: f32) -> f32 {
    let span = max1 - min1;
    if span == 0.0 {
        return min2;
    }
    (value - min1) * (max2 - min2) / span + min2
}
