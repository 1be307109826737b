//! Physics and rules tuning
//!
//! Everything about the board "feel" that is a judgement call rather than
//! geometry lives here, so it can be loaded from JSON instead of recompiled.

use serde::{Deserialize, Serialize};

/// Tunable simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Per-substep velocity damping factor (< 1)
    pub friction: f32,
    /// Fractional velocity retained after wall and body collisions (< 1)
    pub restitution: f32,
    /// Speed below which a body snaps to rest. Without the snap the
    /// zero-velocity checks driving turn resolution would never fire.
    pub rest_epsilon: f32,
    /// Launch power cap; launch speed is `min(drag_distance / 2, max_power)`
    pub max_power: f32,
    /// Drag distance before an idle striker starts aiming
    pub aim_threshold: f32,
    /// Pull-in strength while a body is inside a pocket (scaled by dt)
    pub pocket_pull: f32,
    /// Capture tolerance divisor: a body is captured when its centre is
    /// within `pocket_radius - body_radius / pocket_grace_divisor` of a
    /// pocket centre. Empirical, not a physical derivation.
    pub pocket_grace_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            friction: 0.994,
            restitution: 0.75,
            rest_epsilon: 0.1,
            max_power: 50.0,
            aim_threshold: 5.0,
            pocket_pull: 3.0,
            pocket_grace_divisor: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Capture threshold for a body of the given radius
    #[inline]
    pub fn capture_threshold(&self, pocket_radius: f32, body_radius: f32) -> f32 {
        pocket_radius - body_radius / self.pocket_grace_divisor
    }
}
