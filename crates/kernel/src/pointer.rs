use glam::Vec2;

/// Last known pointer (mouse or touch) state, in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub location: Vec2,
    pub last_location: Vec2,
    /// `last_location - location`: points back along the motion.
    pub velocity: Vec2,
}

impl Pointer {
    /// Record a new sample.
    pub fn record(&mut self, location: Vec2) {
        self.last_location = self.location;
        self.location = location;
        self.velocity = self.last_location - self.location;
    }
}
