//! Headless demo driver
//!
//! Plays a handful of scripted shots against the simulation core and prints
//! the resulting scores. Useful for eyeballing the rules engine and as a
//! smoke test without any presentation layer.

use glam::Vec2;

use carrom::sim::StrikerState;
use carrom::{GameState, TickInput, Tuning, tick};

const DT: f32 = 1.0 / 60.0;

/// Drive one shot to resolution: aim, release, then tick until the shot has
/// been consumed by the turn logic
fn play_shot(state: &mut GameState, drag: Vec2) {
    let aim = TickInput {
        aim: Some(drag),
        ..Default::default()
    };
    tick(state, &aim, DT);
    let release = TickInput {
        aim: Some(drag),
        release: true,
        ..Default::default()
    };
    tick(state, &release, DT);

    for _ in 0..3000 {
        tick(state, &TickInput::default(), DT);
        if !state.shot_started && state.striker_state() == StrikerState::Idle {
            return;
        }
    }
    log::warn!("shot did not settle within the tick budget");
}

fn main() {
    env_logger::init();

    let mut state = GameState::new(Tuning::default());
    log::info!(
        "board ready: {} coins, player {} to shoot",
        state.coins.len(),
        state.current_player
    );

    // A few breaks of varying power and angle; the turn logic decides who
    // actually shoots each one
    let shots = [
        Vec2::new(0.0, 100.0),
        Vec2::new(-20.0, 90.0),
        Vec2::new(15.0, 70.0),
        Vec2::new(-10.0, 110.0),
        Vec2::new(5.0, 80.0),
        Vec2::new(25.0, 95.0),
    ];

    for (i, drag) in shots.iter().enumerate() {
        let shooter = state.current_player;
        play_shot(&mut state, *drag);
        for event in state.take_events() {
            log::info!("shot {i} (player {shooter}): {event:?}");
        }
    }

    let white = &state.players[0];
    let black = &state.players[1];
    println!(
        "white {} ({} banked) | black {} ({} banked)",
        white.score,
        white.banked.len(),
        black.score,
        black.banked.len()
    );
    println!(
        "{} coins on the board, player {} to shoot",
        state.coins.len(),
        state.current_player
    );
}
