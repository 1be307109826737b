//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed substep count per tick
//! - Stable iteration order (coins by insertion, pairs i < j)
//! - No rendering or platform dependencies
//!
//! `physics` moves bodies, `tick` drives input and timers, `turn` applies the
//! carrom scoring rules. `state` owns everything they operate on.

pub mod physics;
pub mod state;
pub mod tick;
pub mod turn;

pub use physics::{clamp_to_bounds, containing_pocket, resolve_collision};
pub use state::{
    Body, Coin, CoinColor, GameEvent, GameState, Player, Pocket, ShotOutcome, Slider, Striker,
    StrikerState, TurnContext, TurnPhase,
};
pub use tick::{TickInput, tick};
