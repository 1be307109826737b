//! Carrom - two-player carrom board simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, striker lifecycle, turn/scoring rules)
//! - `tuning`: Data-driven physics and rules constants
//!
//! Rendering, input capture, and UI live outside this crate. The core consumes
//! already-translated input (`sim::TickInput`) and exposes query accessors plus
//! a drained event list for presentation layers.

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GameState, TickInput, tick};
pub use tuning::Tuning;

/// Board geometry constants (original 700x700 layout)
pub mod consts {
    /// Reference frame rate. Velocities are expressed in units per reference
    /// frame, so integration multiplies by `dt * FRAME_RATE` to stay
    /// independent of the wall-clock delta.
    pub const FRAME_RATE: f32 = 60.0;
    /// Physics substeps per tick for collision stability
    pub const SUBSTEPS: u32 = 6;

    /// Full board dimensions
    pub const BOARD_W: f32 = 700.0;
    pub const BOARD_H: f32 = 700.0;
    /// Playfield boundary (inner edge of the frame)
    pub const BOUND_LEFT: f32 = 40.0;
    pub const BOUND_RIGHT: f32 = 660.0;
    pub const BOUND_TOP: f32 = 40.0;
    pub const BOUND_BOTTOM: f32 = 660.0;
    pub const CENTER_X: f32 = 350.0;
    pub const CENTER_Y: f32 = 350.0;

    /// Body defaults
    pub const STRIKER_RADIUS: f32 = 25.0;
    pub const STRIKER_MASS: f32 = 1.0;
    pub const COIN_RADIUS: f32 = 15.0;
    pub const COIN_MASS: f32 = 0.8;

    /// Striker dock position (baseline row, slider-controlled while idle)
    pub const STRIKER_DEFAULT_X: f32 = 350.0;
    pub const STRIKER_DEFAULT_Y: f32 = 585.0;
    /// Horizontal inset of the striker slider from the playfield edges
    pub const SLIDER_OFFSET: f32 = 100.0;

    /// Drag length cap as a multiple of the maximum launch power, keeping
    /// the displayed pull proportional to the shot that results
    pub const DRAG_CAP_FACTOR: f32 = 2.0;
    /// Drags at or below this length are discarded on release
    pub const MIN_LAUNCH_DRAG: f32 = 0.1;

    /// Pocket capture radius and corner inset factor
    pub const POCKET_RADIUS: f32 = 22.5;
    pub const POCKET_INSET_FACTOR: f32 = 1.5;

    /// Initial coin layout: two concentric rings plus the queen at centre
    pub const RING1_COUNT: usize = 6;
    pub const RING2_COUNT: usize = 12;
    pub const RING1_RADIUS: f32 = 32.0;
    pub const RING2_RADIUS: f32 = 62.0;

    /// Seconds of stillness before a moving striker re-docks
    pub const STRIKER_RESET_DELAY: f32 = 1.0;
    /// Seconds a captured body "falls" before the capture is scored
    pub const POCKET_FALL_DELAY: f32 = 1.0;

    /// First player to this score wins (and the game resets)
    pub const TARGET_SCORE: i32 = 10;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
