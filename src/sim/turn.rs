//! Turn and scoring state machine
//!
//! Runs once per tick after physics. Consumes the batch of completed coin
//! captures, applies carrom scoring (own color retains, opponent color
//! scores for the opponent and forfeits the turn, queen requires a
//! same-turn cover), then resolves turn continuation once the shot settles.
//!
//! Scores are never allowed to stay negative on account of a banked coin:
//! when crediting a coin would leave its scorer at zero or below, the coin
//! is respawned at board centre instead of banked.

use glam::Vec2;

use super::state::{
    CoinColor, GameEvent, GameState, ShotOutcome, StrikerState, TurnPhase,
};
use crate::consts::*;

pub(crate) fn resolve(state: &mut GameState) {
    process_captures(state);

    if let Some(winner) = state.players.iter().position(|p| p.score >= TARGET_SCORE) {
        log::info!("player {winner} reached {TARGET_SCORE}; game over, resetting board");
        state.push_event(GameEvent::GameReset { winner });
        state.reset_game();
        return;
    }

    if state.striker.state == StrikerState::Moving {
        state.shot_started = true;
        state.first_turn = false;
    }

    // The shot is only resolved once the striker has fully come home:
    // re-docked idle, or sitting in a pocket awaiting its foul
    if !state.shot_started
        || !matches!(
            state.striker.state,
            StrikerState::Idle | StrikerState::Pocket
        )
    {
        return;
    }

    // A forced cover attempt that pocketed no own-color coin forfeits the
    // queen and a point
    if state.turn.phase == TurnPhase::CoverAttempt && state.current().pending_queen {
        let own = state.current().color;
        if !state.turn.pocketed.contains(&own) {
            let player = state.current_player;
            state.current_mut().add_score(-1);
            state.current_mut().pending_queen = false;
            state.spawn_coin(CoinColor::Queen);
            state.push_event(GameEvent::CoverFailed { player });
            log::info!("player {player} failed the queen cover; queen returned to centre");
            switch_turn(state);
            return;
        }
    }

    if state.striker.state == StrikerState::Pocket {
        // Self-foul: lose a point and return a banked coin to the board
        let player = state.current_player;
        state.current_mut().add_score(-1);
        if let Some(color) = state.current_mut().take_banked_coin() {
            state.spawn_coin(color);
        }
        state.push_event(GameEvent::StrikerPocketed { player });
        log::info!("player {player} pocketed the striker; penalty applied");
        switch_turn(state);
    } else if !state.turn.pocketed.is_empty() {
        if state.turn.outcome == ShotOutcome::Retain {
            state.turn.reset_shot();
            if state.current().pending_queen {
                start_cover_turn(state);
            } else {
                state.turn.phase = TurnPhase::Open;
                state.dock_striker();
                state.shot_started = false;
            }
        } else {
            switch_turn(state);
        }
    } else if state.current().pending_queen {
        start_cover_turn(state);
    } else {
        switch_turn(state);
    }
}

/// Score every completed capture queued since the last pass. Each id was
/// latched by `pocket_processed`, so a capture is consumed exactly once.
fn process_captures(state: &mut GameState) {
    let center = Vec2::new(CENTER_X, CENTER_Y);
    let mut ids = std::mem::take(&mut state.pending_captures);
    // Queen first: an own-color coin whose fall completes in the same tick
    // must be scored after her so it covers her immediately
    ids.sort_by_key(|id| match state.coins.iter().find(|c| c.id == *id) {
        Some(c) if c.color == CoinColor::Queen => 0,
        _ => 1,
    });

    for id in ids {
        let Some(index) = state.coins.iter().position(|c| c.id == id) else {
            continue;
        };
        let color = state.coins[index].color;
        state.turn.pocketed.push(color);

        match color {
            CoinColor::Queen => {
                if state.current().pending_queen {
                    // Already holding an uncovered queen; never double-count
                    continue;
                }
                let scorer = state.current_player;
                state.current_mut().add_score(1);
                state.turn.tally += 1;
                state.turn.outcome.note_retain();
                state.current_mut().pending_queen = true;
                if state.current().score <= 0 {
                    // Queen capture is reverted, not banked, when the score
                    // cannot support it
                    state.coins[index].body.respawn_at(center);
                    state.current_mut().pending_queen = false;
                    state.turn.phase = TurnPhase::Open;
                    state.push_event(GameEvent::CoinReturned { color, player: scorer });
                } else {
                    state.coins.remove(index);
                    log::info!("player {scorer} pocketed the queen; cover required");
                }
                state.push_event(GameEvent::CoinPocketed { color, scorer });
            }
            c if c == state.current().color => {
                let scorer = state.current_player;
                state.current_mut().add_score(1);
                state.turn.tally += 1;
                state.turn.outcome.note_retain();
                if state.current().score <= 0 {
                    state.coins[index].body.respawn_at(center);
                    state.push_event(GameEvent::CoinReturned { color, player: scorer });
                } else {
                    state.current_mut().bank_coin(color);
                    state.coins.remove(index);
                    if state.current().pending_queen {
                        // Own-color coin in the same turn covers the queen
                        state.current_mut().bank_coin(CoinColor::Queen);
                        state.current_mut().pending_queen = false;
                        state.turn.phase = TurnPhase::Open;
                        state.push_event(GameEvent::QueenCovered { player: scorer });
                        log::info!("player {scorer} covered the queen");
                    }
                }
                state.push_event(GameEvent::CoinPocketed { color, scorer });
            }
            _ => {
                let scorer = state.opponent_index();
                state.opponent_mut().add_score(1);
                state.turn.outcome.note_pass();
                if state.players[scorer].score <= 0 {
                    state.coins[index].body.respawn_at(center);
                    state.push_event(GameEvent::CoinReturned { color, player: scorer });
                } else {
                    state.players[scorer].bank_coin(color);
                    state.coins.remove(index);
                }
                state.push_event(GameEvent::CoinPocketed { color, scorer });
            }
        }
    }
}

/// Pass the turn: other player, board rotated 180 degrees, fresh context.
/// Any pending-queen flag the incoming player carries is stale and cleared.
fn switch_turn(state: &mut GameState) {
    state.current_player = state.opponent_index();
    state.rotate_board();
    state.turn.reset();
    state.current_mut().pending_queen = false;
    state.shot_started = false;
    let to = state.current_player;
    state.push_event(GameEvent::TurnPassed { to });
    log::info!("turn passed to player {to}");
}

/// Same player, striker re-docked, cover obligation armed
fn start_cover_turn(state: &mut GameState) {
    state.turn.reset_shot();
    state.turn.phase = TurnPhase::CoverAttempt;
    state.dock_striker();
    state.shot_started = false;
    log::info!(
        "player {} enters a forced cover attempt",
        state.current_player
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(Tuning::default())
    }

    /// Mark a coin's capture as complete, the way the tick timer would
    fn capture(state: &mut GameState, id: u32) {
        let coin = state.coins.iter_mut().find(|c| c.id == id).unwrap();
        coin.body.pocketed = true;
        coin.body.pocket_processed = true;
        state.pending_captures.push(id);
    }

    fn coin_id(state: &GameState, color: CoinColor) -> u32 {
        state
            .coins
            .iter()
            .find(|c| c.color == color)
            .map(|c| c.id)
            .unwrap()
    }

    /// Pretend the shot has been taken and the striker has settled
    fn settle_shot(state: &mut GameState) {
        state.shot_started = true;
        state.striker.state = StrikerState::Idle;
    }

    #[test]
    fn test_own_coin_scores_and_retains() {
        let mut state = new_state();
        state.players[0].score = 5;
        let id = coin_id(&state, CoinColor::White);
        let coins_before = state.coins.len();

        capture(&mut state, id);
        settle_shot(&mut state);
        resolve(&mut state);

        assert_eq!(state.players[0].score, 6);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.coins.len(), coins_before - 1);
        assert!(!state.shot_started);
        assert_eq!(state.striker.state, StrikerState::Idle);
        assert_eq!(state.players[0].banked, vec![CoinColor::White]);
    }

    #[test]
    fn test_opponent_coin_scores_for_opponent_and_passes() {
        let mut state = new_state();
        let id = coin_id(&state, CoinColor::Black);
        let rotation_before = state.rotation;

        capture(&mut state, id);
        settle_shot(&mut state);
        resolve(&mut state);

        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.players[1].score, 1);
        assert_eq!(state.current_player, 1);
        assert!(state.rotation > rotation_before);
        assert_eq!(state.players[1].banked, vec![CoinColor::Black]);
    }

    #[test]
    fn test_mixed_batch_passes_turn() {
        // An opponent coin in the batch forfeits the turn even though an
        // own-color coin also went down
        let mut state = new_state();
        let own = coin_id(&state, CoinColor::White);
        let theirs = coin_id(&state, CoinColor::Black);

        capture(&mut state, own);
        capture(&mut state, theirs);
        settle_shot(&mut state);
        resolve(&mut state);

        assert_eq!(state.players[0].score, 1);
        assert_eq!(state.players[1].score, 1);
        assert_eq!(state.current_player, 1);
    }

    #[test]
    fn test_no_double_count_across_passes() {
        let mut state = new_state();
        let id = coin_id(&state, CoinColor::White);

        capture(&mut state, id);
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.players[0].score, 1);

        // A second pass with no new capture adds nothing
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.players[0].score, 1);
    }

    #[test]
    fn test_score_floor_respawns_instead_of_banking() {
        let mut state = new_state();
        state.players[0].score = -1;
        let id = coin_id(&state, CoinColor::White);
        let coins_before = state.coins.len();

        capture(&mut state, id);
        settle_shot(&mut state);
        resolve(&mut state);

        // +1 lands at zero: coin returns to centre rather than banking
        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.coins.len(), coins_before);
        assert!(state.players[0].banked.is_empty());
        let coin = state.coins.iter().find(|c| c.id == id).unwrap();
        assert_eq!(coin.body.pos, Vec2::new(CENTER_X, CENTER_Y));
        assert!(!coin.body.pocketed && !coin.body.pocket_processed);
        // UI gets both the pocket and the return
        let events = state.take_events();
        assert!(events.contains(&GameEvent::CoinPocketed {
            color: CoinColor::White,
            scorer: 0
        }));
        assert!(events.contains(&GameEvent::CoinReturned {
            color: CoinColor::White,
            player: 0
        }));
    }

    #[test]
    fn test_queen_arbitration() {
        // At a supporting score the queen leaves the board and arms the cover
        let mut state = new_state();
        state.players[0].score = 1;
        let queen = coin_id(&state, CoinColor::Queen);
        capture(&mut state, queen);
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.players[0].score, 2);
        assert!(state.players[0].pending_queen);
        assert!(state.coins.iter().all(|c| c.color != CoinColor::Queen));
        // Cover still owed: same player, forced cover attempt
        assert_eq!(state.current_player, 0);
        assert_eq!(state.turn.phase, TurnPhase::CoverAttempt);

        // At a non-positive resulting score the capture is reverted
        let mut state = new_state();
        state.players[0].score = -1;
        let queen = coin_id(&state, CoinColor::Queen);
        let coins_before = state.coins.len();
        capture(&mut state, queen);
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.players[0].score, 0);
        assert!(!state.players[0].pending_queen);
        assert_eq!(state.coins.len(), coins_before);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::CoinReturned {
            color: CoinColor::Queen,
            player: 0
        }));
    }

    #[test]
    fn test_queen_not_double_counted() {
        let mut state = new_state();
        state.players[0].score = 1;
        state.players[0].pending_queen = true;
        let queen = coin_id(&state, CoinColor::Queen);

        capture(&mut state, queen);
        settle_shot(&mut state);
        resolve(&mut state);

        // Ignored entirely: no score, queen neither banked nor removed
        assert_eq!(state.players[0].score, 1);
    }

    #[test]
    fn test_cover_by_own_coin_in_same_turn() {
        // The fall timers complete in board order, so the own coin (lower
        // id) is queued ahead of the queen; she must still be covered
        for queen_first in [false, true] {
            let mut state = new_state();
            state.players[0].score = 2;
            let queen = coin_id(&state, CoinColor::Queen);
            let own = coin_id(&state, CoinColor::White);

            if queen_first {
                capture(&mut state, queen);
                capture(&mut state, own);
            } else {
                capture(&mut state, own);
                capture(&mut state, queen);
            }
            settle_shot(&mut state);
            resolve(&mut state);

            assert_eq!(state.players[0].score, 4);
            assert!(!state.players[0].pending_queen);
            assert!(state.players[0].banked.contains(&CoinColor::Queen));
            assert!(state.players[0].banked.contains(&CoinColor::White));
            // Turn retained as a normal shot, not a cover attempt
            assert_eq!(state.current_player, 0);
            assert_eq!(state.turn.phase, TurnPhase::Open);
            let events = state.take_events();
            assert!(events.contains(&GameEvent::QueenCovered { player: 0 }));
        }
    }

    #[test]
    fn test_cover_failure_forfeits_queen_and_point() {
        let mut state = new_state();
        state.players[0].score = 3;
        state.players[0].pending_queen = true;
        state.turn.phase = TurnPhase::CoverAttempt;
        // Queen is off the board while pending
        let queen = coin_id(&state, CoinColor::Queen);
        state.coins.retain(|c| c.id != queen);

        settle_shot(&mut state);
        resolve(&mut state);

        assert_eq!(state.players[0].score, 2);
        assert!(!state.players[0].pending_queen);
        // Queen respawned at centre
        let queen = state
            .coins
            .iter()
            .find(|c| c.color == CoinColor::Queen)
            .unwrap();
        assert_eq!(queen.body.pos, Vec2::new(CENTER_X, CENTER_Y));
        assert_eq!(state.current_player, 1);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::CoverFailed { player: 0 }));
    }

    #[test]
    fn test_striker_foul_returns_banked_coin() {
        let mut state = new_state();
        state.players[0].score = 3;
        state.players[0].banked = vec![CoinColor::White, CoinColor::Queen];
        let coins_before = state.coins.len();

        state.shot_started = true;
        state.striker.state = StrikerState::Pocket;
        resolve(&mut state);

        assert_eq!(state.players[0].score, 2);
        // Queen is preferred for the payback
        assert_eq!(state.players[0].banked, vec![CoinColor::White]);
        assert_eq!(state.coins.len(), coins_before + 1);
        assert_eq!(state.current_player, 1);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::StrikerPocketed { player: 0 }));
    }

    #[test]
    fn test_striker_foul_with_empty_bank() {
        let mut state = new_state();
        let coins_before = state.coins.len();
        state.shot_started = true;
        state.striker.state = StrikerState::Pocket;
        resolve(&mut state);

        assert_eq!(state.players[0].score, -1);
        assert_eq!(state.coins.len(), coins_before);
        assert_eq!(state.current_player, 1);
    }

    #[test]
    fn test_empty_shot_passes_turn() {
        let mut state = new_state();
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.current_player, 1);
    }

    #[test]
    fn test_switch_clears_stale_pending_queen() {
        let mut state = new_state();
        state.players[1].pending_queen = true;
        settle_shot(&mut state);
        resolve(&mut state);
        assert_eq!(state.current_player, 1);
        assert!(!state.players[1].pending_queen);
    }

    #[test]
    fn test_win_resets_game() {
        let mut state = new_state();
        state.players[0].score = 9;
        state.players[1].score = 4;
        let id = coin_id(&state, CoinColor::White);

        capture(&mut state, id);
        settle_shot(&mut state);
        resolve(&mut state);

        assert_eq!(state.players[0].score, 0);
        assert_eq!(state.players[1].score, 0);
        assert_eq!(state.current_player, 0);
        assert_eq!(state.coins.len(), RING1_COUNT + RING2_COUNT + 1);
        assert!(state.first_turn);
        let events = state.take_events();
        assert!(events.contains(&GameEvent::GameReset { winner: 0 }));
    }

    #[test]
    fn test_unresolved_shot_does_not_pass() {
        let mut state = new_state();
        state.shot_started = true;
        state.striker.state = StrikerState::Moving;
        resolve(&mut state);
        assert_eq!(state.current_player, 0);
    }
}
