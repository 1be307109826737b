//! Per-tick simulation driver
//!
//! Order within one tick: apply input -> idle striker follows slider ->
//! fixed physics substeps -> striker lifecycle timers -> coin pocket timers
//! -> turn/scoring pass. Everything is synchronous; timers are plain
//! accumulators compared against fixed thresholds.

use glam::Vec2;

use super::physics;
use super::state::{GameState, StrikerState};
use super::turn;
use crate::consts::*;

/// Input commands for a single tick, already translated from raw pointer
/// events by the input collaborator
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Idle-slider position along the baseline (board x coordinate)
    pub slider_x: Option<f32>,
    /// Pre-game ring-rotation slider angle (radians); live until the first
    /// shot is taken
    pub ring_angle: Option<f32>,
    /// Current drag vector from the pointer-down origin
    pub aim: Option<Vec2>,
    /// Pointer released this tick (commits the aim as a launch)
    pub release: bool,
}

/// Advance the simulation by one tick
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_input(state, input);

    // Idle striker is not simulated; it rides the slider on the dock row
    if state.striker.state == StrikerState::Idle {
        state.striker.body.pos = Vec2::new(state.slider.handle_x, STRIKER_DEFAULT_Y);
        state.striker.body.vel = Vec2::ZERO;
    }

    let sub_dt = dt / SUBSTEPS as f32;
    for _ in 0..SUBSTEPS {
        physics::substep(state, sub_dt);
    }

    update_striker_lifecycle(state, dt);
    update_coin_pockets(state, dt);

    turn::resolve(state);
}

fn apply_input(state: &mut GameState, input: &TickInput) {
    if let Some(x) = input.slider_x
        && state.striker.state == StrikerState::Idle
    {
        state.slider.set(x);
    }

    if let Some(angle) = input.ring_angle
        && state.first_turn
    {
        state.rotate_ring_layout(angle);
    }

    if let Some(drag) = input.aim
        && matches!(state.striker.state, StrikerState::Idle | StrikerState::Aiming)
    {
        if state.striker.state == StrikerState::Idle
            && drag.length() > state.tuning.aim_threshold
        {
            state.striker.state = StrikerState::Aiming;
        }
        if state.striker.state == StrikerState::Aiming {
            // Cap the drag so displayed pull and launch power agree
            let max_len = state.tuning.max_power * DRAG_CAP_FACTOR;
            let len = drag.length();
            state.aim = Some(if len > max_len { drag * (max_len / len) } else { drag });
        }
    }

    if input.release && state.striker.state == StrikerState::Aiming {
        launch(state);
    }
}

/// Commit the stored aim as a launch: velocity opposite the drag, magnitude
/// `min(drag / 2, max_power)`
fn launch(state: &mut GameState) {
    let Some(drag) = state.aim.take() else {
        state.striker.state = StrikerState::Idle;
        return;
    };
    let dist = drag.length();
    if dist <= MIN_LAUNCH_DRAG {
        state.striker.state = StrikerState::Idle;
        return;
    }
    let power = (dist / 2.0).min(state.tuning.max_power);
    state.striker.body.vel = -(drag / dist) * power;
    state.striker.state = StrikerState::Moving;
    log::debug!(
        "shot launched by player {} with power {:.1}",
        state.current_player,
        power
    );
}

fn update_striker_lifecycle(state: &mut GameState, dt: f32) {
    let tuning = state.tuning.clone();

    if state.striker.state == StrikerState::Moving
        && physics::containing_pocket(&state.pockets, &state.striker.body, &tuning).is_some()
    {
        state.striker.state = StrikerState::Pocket;
        state.striker.reset_timer = 0.0;
        state.striker.body.vel = Vec2::ZERO;
        log::info!("striker pocketed (self-foul pending)");
    }

    match state.striker.state {
        StrikerState::Moving => {
            if state.striker.body.at_rest() {
                state.striker.reset_timer += dt;
                if state.striker.reset_timer >= STRIKER_RESET_DELAY {
                    state.dock_striker();
                }
            } else {
                state.striker.reset_timer = 0.0;
            }
        }
        StrikerState::Pocket => {
            state.striker.reset_timer += dt;
            if state.striker.reset_timer >= POCKET_FALL_DELAY {
                state.dock_striker();
            }
        }
        _ => {}
    }
}

/// Run coin capture detection and fall timers; a finished fall queues the
/// coin for scoring exactly once via the `pocket_processed` latch
fn update_coin_pockets(state: &mut GameState, dt: f32) {
    let tuning = state.tuning.clone();
    let pockets = state.pockets;
    let mut captured = Vec::new();

    for coin in &mut state.coins {
        if !coin.body.pocketed
            && !coin.body.pocket_processed
            && physics::containing_pocket(&pockets, &coin.body, &tuning).is_some()
        {
            coin.body.pocketed = true;
            coin.body.pocket_timer = 0.0;
        }
        if coin.body.pocketed && !coin.body.pocket_processed {
            coin.body.pocket_timer += dt;
            if coin.body.pocket_timer >= POCKET_FALL_DELAY {
                coin.body.pocket_processed = true;
                captured.push(coin.id);
            }
        }
    }

    for id in captured {
        state.pending_captures.push(id);
    }
}
