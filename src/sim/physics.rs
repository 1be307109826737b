//! Rigid-body physics for discs on a bounded board
//!
//! One substep runs integrate -> friction -> boundary reflect ->
//! striker-vs-coin -> coin pairs -> pocket pull, in that order. Velocities
//! are in reference-frame units (see `consts::FRAME_RATE`), so position
//! integration scales by `dt * FRAME_RATE`.

use glam::Vec2;

use super::state::{Body, GameState, Pocket, StrikerState};
use crate::consts::*;
use crate::lerp;
use crate::tuning::Tuning;

/// Advance a body's position by its velocity
#[inline]
pub fn integrate(body: &mut Body, dt: f32) {
    body.pos += body.vel * dt * FRAME_RATE;
}

/// Damp velocity and snap to rest below the epsilon threshold
pub fn apply_friction(body: &mut Body, friction: f32, rest_epsilon: f32) {
    body.vel *= friction;
    if body.speed() < rest_epsilon {
        body.vel = Vec2::ZERO;
    }
}

/// Clamp the body inside the playfield, reflecting the offending velocity
/// component with restitution. Axes are handled independently, so a corner
/// contact reflects on both.
pub fn clamp_to_bounds(body: &mut Body, restitution: f32) {
    if body.pos.x < BOUND_LEFT + body.radius {
        body.pos.x = BOUND_LEFT + body.radius;
        body.vel.x = -body.vel.x * restitution;
    } else if body.pos.x > BOUND_RIGHT - body.radius {
        body.pos.x = BOUND_RIGHT - body.radius;
        body.vel.x = -body.vel.x * restitution;
    }
    if body.pos.y < BOUND_TOP + body.radius {
        body.pos.y = BOUND_TOP + body.radius;
        body.vel.y = -body.vel.y * restitution;
    } else if body.pos.y > BOUND_BOTTOM - body.radius {
        body.pos.y = BOUND_BOTTOM - body.radius;
        body.vel.y = -body.vel.y * restitution;
    }
}

/// Resolve overlap and apply a restitution impulse between two discs
///
/// Positional correction splits the overlap equally (not mass-weighted; the
/// impulse is). Exact centre overlap is a guarded no-op. Bodies already
/// separating get the position fix but no impulse.
pub fn resolve_collision(a: &mut Body, b: &mut Body, restitution: f32) {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let min_dist = a.radius + b.radius;

    if dist >= min_dist || dist <= 0.0 {
        return;
    }

    let normal = delta / dist;
    let overlap = (min_dist - dist) / 2.0;
    a.pos -= normal * overlap;
    b.pos += normal * overlap;

    let rel_vel = b.vel - a.vel;
    let vel_along_normal = rel_vel.dot(normal);
    if vel_along_normal > 0.0 {
        return;
    }

    let impulse = -(1.0 + restitution) * vel_along_normal / (1.0 / a.mass + 1.0 / b.mass);
    a.vel -= impulse * normal / a.mass;
    b.vel += impulse * normal / b.mass;
}

/// The pocket currently containing the body, if any
///
/// Capture requires the centre to be substantially inside, not merely
/// grazing: within `pocket_radius - body_radius / grace_divisor`.
pub fn containing_pocket<'a>(
    pockets: &'a [Pocket],
    body: &Body,
    tuning: &Tuning,
) -> Option<&'a Pocket> {
    pockets.iter().find(|p| {
        body.pos.distance(p.pos) < tuning.capture_threshold(p.radius, body.radius)
    })
}

/// Ease a captured body toward the pocket centre (cosmetic fall-in)
pub fn pocket_pull(body: &mut Body, pocket_pos: Vec2, pull: f32, dt: f32) {
    let t = pull * dt;
    body.pos.x = lerp(body.pos.x, pocket_pos.x, t);
    body.pos.y = lerp(body.pos.y, pocket_pos.y, t);
}

/// One physics substep over the whole board
pub(crate) fn substep(state: &mut GameState, dt: f32) {
    let tuning = state.tuning.clone();

    // Striker: integrates only while moving; friction and bounds always
    if state.striker.state == StrikerState::Moving {
        integrate(&mut state.striker.body, dt);
    }
    apply_friction(&mut state.striker.body, tuning.friction, tuning.rest_epsilon);
    clamp_to_bounds(&mut state.striker.body, tuning.restitution);

    // Coins: a captured coin stops integrating (the pull below owns its
    // position) but still damps and clamps
    for coin in &mut state.coins {
        if !coin.body.pocketed {
            integrate(&mut coin.body, dt);
        }
        apply_friction(&mut coin.body, tuning.friction, tuning.rest_epsilon);
        clamp_to_bounds(&mut coin.body, tuning.restitution);
    }

    for coin in &mut state.coins {
        resolve_collision(&mut state.striker.body, &mut coin.body, tuning.restitution);
    }

    for i in 0..state.coins.len() {
        let (head, tail) = state.coins.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail {
            resolve_collision(&mut a.body, &mut b.body, tuning.restitution);
        }
    }

    if let Some(p) = containing_pocket(&state.pockets, &state.striker.body, &tuning) {
        let pos = p.pos;
        pocket_pull(&mut state.striker.body, pos, tuning.pocket_pull, dt);
    }
    let pockets = state.pockets;
    for coin in &mut state.coins {
        if let Some(p) = containing_pocket(&pockets, &coin.body, &tuning) {
            pocket_pull(&mut coin.body, p.pos, tuning.pocket_pull, dt);
        }
    }
}
