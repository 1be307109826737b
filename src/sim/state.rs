//! Game state and core simulation types
//!
//! Everything the simulation owns lives here: bodies, pockets, players, the
//! per-turn context, and the composed `GameState`. No rendering handles; a
//! presentation layer maps coin ids to drawables on its own side.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Coin color tag. `Queen` is the neutral bonus piece; players own the
/// other two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinColor {
    White,
    Black,
    Queen,
}

impl CoinColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoinColor::White => "white",
            CoinColor::Black => "black",
            CoinColor::Queen => "queen",
        }
    }
}

/// A circular rigid body (striker or coin)
///
/// Radius and mass are fixed at creation. The pocket fields track capture:
/// `pocketed` flips when the body falls inside a pocket, `pocket_timer`
/// accumulates the fall delay, and `pocket_processed` latches once the
/// capture has been consumed by scoring so it can never double-count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub pocketed: bool,
    pub pocket_timer: f32,
    pub pocket_processed: bool,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            mass,
            pocketed: false,
            pocket_timer: 0.0,
            pocket_processed: false,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    #[inline]
    pub fn at_rest(&self) -> bool {
        self.vel == Vec2::ZERO
    }

    /// Return the body to play at the given position, clearing velocity and
    /// all capture state
    pub fn respawn_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.pocketed = false;
        self.pocket_timer = 0.0;
        self.pocket_processed = false;
    }
}

/// A playing coin on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub color: CoinColor,
    pub body: Body,
}

/// Striker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrikerState {
    /// Docked on the baseline, tracking the slider
    Idle,
    /// A drag past the aim threshold is in progress
    Aiming,
    /// Launched and physics-integrated
    Moving,
    /// Fell into a pocket (self-foul); waiting out the fall delay
    Pocket,
}

/// The striker disc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Striker {
    pub body: Body,
    pub state: StrikerState,
    /// Accumulates stillness (Moving) or fall time (Pocket) toward re-dock
    pub reset_timer: f32,
}

impl Striker {
    fn new() -> Self {
        Self {
            body: Body::new(
                Vec2::new(STRIKER_DEFAULT_X, STRIKER_DEFAULT_Y),
                STRIKER_RADIUS,
                STRIKER_MASS,
            ),
            state: StrikerState::Idle,
            reset_timer: 0.0,
        }
    }
}

/// A static corner pocket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec2,
    pub radius: f32,
}

/// Horizontal slider positioning the idle striker along the baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slider {
    pub min: f32,
    pub max: f32,
    pub handle_x: f32,
}

impl Slider {
    fn new() -> Self {
        Self {
            min: BOUND_LEFT + STRIKER_RADIUS + SLIDER_OFFSET,
            max: BOUND_RIGHT - STRIKER_RADIUS - SLIDER_OFFSET,
            handle_x: STRIKER_DEFAULT_X,
        }
    }

    pub fn set(&mut self, x: f32) {
        self.handle_x = x.clamp(self.min, self.max);
    }
}

/// A player record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub color: CoinColor,
    /// May dip to zero but never stays negative for banked coins; the turn
    /// logic respawns a coin instead of banking it when the score is not
    /// positive
    pub score: i32,
    /// Pocketed-and-credited coins, held against future self-foul paybacks
    pub banked: Vec<CoinColor>,
    /// Pocketed the queen and still owes a same-turn cover
    pub pending_queen: bool,
}

impl Player {
    fn new(id: u32, color: CoinColor) -> Self {
        Self {
            id,
            color,
            score: 0,
            banked: Vec::new(),
            pending_queen: false,
        }
    }

    pub fn add_score(&mut self, points: i32) {
        self.score += points;
    }

    pub fn bank_coin(&mut self, color: CoinColor) {
        self.banked.push(color);
    }

    /// Remove one banked coin to pay a penalty, preferring the queen over an
    /// own-color coin. Returns `None` when nothing is banked.
    pub fn take_banked_coin(&mut self) -> Option<CoinColor> {
        if let Some(i) = self.banked.iter().position(|c| *c == CoinColor::Queen) {
            return Some(self.banked.remove(i));
        }
        if let Some(i) = self.banked.iter().position(|c| *c == self.color) {
            return Some(self.banked.remove(i));
        }
        None
    }

    fn reset(&mut self) {
        self.score = 0;
        self.banked.clear();
        self.pending_queen = false;
    }
}

/// Whether the shot being resolved keeps or passes the turn
///
/// `Pass` is sticky: pocketing an opponent coin forfeits the turn even if an
/// own-color coin went down in the same batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShotOutcome {
    #[default]
    Undecided,
    Retain,
    Pass,
}

impl ShotOutcome {
    pub fn note_retain(&mut self) {
        if *self == ShotOutcome::Undecided {
            *self = ShotOutcome::Retain;
        }
    }

    pub fn note_pass(&mut self) {
        *self = ShotOutcome::Pass;
    }
}

/// Sub-turn phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Normal shot
    #[default]
    Open,
    /// Forced cover attempt: the player holds an uncovered queen and must
    /// pocket an own-color coin this shot or forfeit it
    CoverAttempt,
}

/// Per-shot scoring context, reset whenever the turn or shot rolls over
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnContext {
    pub phase: TurnPhase,
    pub outcome: ShotOutcome,
    /// Points scored this turn (display tally)
    pub tally: i32,
    /// Colors pocketed since the shot began
    pub pocketed: Vec<CoinColor>,
}

impl TurnContext {
    /// Clear per-shot scoring while keeping the phase
    pub fn reset_shot(&mut self) {
        self.outcome = ShotOutcome::Undecided;
        self.tally = 0;
        self.pocketed.clear();
    }

    pub fn reset(&mut self) {
        self.phase = TurnPhase::Open;
        self.reset_shot();
    }
}

/// Feedback for the presentation layer, drained via `take_events`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinPocketed { color: CoinColor, scorer: usize },
    /// The capture was credited but the coin went back to board centre
    /// because the scorer's total could not support banking it
    CoinReturned { color: CoinColor, player: usize },
    QueenCovered { player: usize },
    CoverFailed { player: usize },
    StrikerPocketed { player: usize },
    TurnPassed { to: usize },
    GameReset { winner: usize },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub striker: Striker,
    pub coins: Vec<Coin>,
    pub pockets: [Pocket; 4],
    pub slider: Slider,
    /// Accumulated board rotation (alternates 0 / pi with turn passes)
    pub rotation: f32,
    pub players: [Player; 2],
    pub current_player: usize,
    pub turn: TurnContext,
    /// A shot has been launched and not yet resolved
    pub shot_started: bool,
    /// No shot taken yet; the ring-rotation slider is still live
    pub first_turn: bool,
    /// Current aim drag vector while aiming
    pub aim: Option<Vec2>,
    /// Coin ids whose capture completed this tick, awaiting scoring
    pub(crate) pending_captures: Vec<u32>,
    events: Vec<GameEvent>,
    next_coin_id: u32,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        let inset = POCKET_RADIUS * POCKET_INSET_FACTOR;
        let pockets = [
            Pocket {
                pos: Vec2::new(BOUND_LEFT + inset, BOUND_TOP + inset),
                radius: POCKET_RADIUS,
            },
            Pocket {
                pos: Vec2::new(BOUND_RIGHT - inset, BOUND_TOP + inset),
                radius: POCKET_RADIUS,
            },
            Pocket {
                pos: Vec2::new(BOUND_LEFT + inset, BOUND_BOTTOM - inset),
                radius: POCKET_RADIUS,
            },
            Pocket {
                pos: Vec2::new(BOUND_RIGHT - inset, BOUND_BOTTOM - inset),
                radius: POCKET_RADIUS,
            },
        ];

        let mut state = Self {
            tuning,
            striker: Striker::new(),
            coins: Vec::new(),
            pockets,
            slider: Slider::new(),
            rotation: 0.0,
            players: [
                Player::new(1, CoinColor::White),
                Player::new(2, CoinColor::Black),
            ],
            current_player: 0,
            turn: TurnContext::default(),
            shot_started: false,
            first_turn: true,
            aim: None,
            pending_captures: Vec::new(),
            events: Vec::new(),
            next_coin_id: 0,
        };
        state.setup_coins();
        state
    }

    /// Lay out the canonical two-ring-plus-queen formation
    fn setup_coins(&mut self) {
        self.coins.clear();
        self.next_coin_id = 0;
        let center = Vec2::new(CENTER_X, CENTER_Y);

        let mut alternator = 0usize;
        for (count, radius) in [(RING1_COUNT, RING1_RADIUS), (RING2_COUNT, RING2_RADIUS)] {
            for i in 0..count {
                let ang = i as f32 * (std::f32::consts::TAU / count as f32);
                let pos = center + radius * Vec2::new(ang.cos(), ang.sin());
                alternator += 1;
                let color = if alternator % 2 == 1 {
                    CoinColor::White
                } else {
                    CoinColor::Black
                };
                self.push_coin(color, pos);
            }
        }
        self.push_coin(CoinColor::Queen, center);
    }

    fn push_coin(&mut self, color: CoinColor, pos: Vec2) {
        let id = self.next_coin_id;
        self.next_coin_id += 1;
        self.coins.push(Coin {
            id,
            color,
            body: Body::new(pos, COIN_RADIUS, COIN_MASS),
        });
    }

    /// Spawn a returned coin at board centre (penalty payback or failed
    /// queen cover)
    pub fn spawn_coin(&mut self, color: CoinColor) {
        self.push_coin(color, Vec2::new(CENTER_X, CENTER_Y));
    }

    /// Rotate the central ring formation (pre-game slider, first turn only).
    /// Positions are re-derived from the base layout, so repeated calls do
    /// not accumulate.
    pub fn rotate_ring_layout(&mut self, angle: f32) {
        let center = Vec2::new(CENTER_X, CENTER_Y);
        for (i, coin) in self
            .coins
            .iter_mut()
            .take(RING1_COUNT + RING2_COUNT + 1)
            .enumerate()
        {
            let (base_angle, radius) = if i < RING1_COUNT {
                (i as f32 * (std::f32::consts::TAU / RING1_COUNT as f32), RING1_RADIUS)
            } else if i < RING1_COUNT + RING2_COUNT {
                (
                    (i - RING1_COUNT) as f32 * (std::f32::consts::TAU / RING2_COUNT as f32),
                    RING2_RADIUS,
                )
            } else {
                (0.0, 0.0)
            };
            let a = base_angle + angle;
            coin.body.pos = center + radius * Vec2::new(a.cos(), a.sin());
        }
    }

    /// Rotate the whole board 180 degrees about its centre (turn pass), so
    /// the incoming player shoots from their own baseline
    pub fn rotate_board(&mut self) {
        self.rotation += std::f32::consts::PI;
        let center = Vec2::new(BOARD_W / 2.0, BOARD_H / 2.0);

        self.striker.body.pos = 2.0 * center - self.striker.body.pos;
        for coin in &mut self.coins {
            coin.body.pos = 2.0 * center - coin.body.pos;
        }
        // Slider geometry is symmetric; just keep the handle in range
        self.slider.handle_x = self.slider.handle_x.clamp(self.slider.min, self.slider.max);
    }

    /// Return the striker to its dock, idle, with the slider centred
    pub fn dock_striker(&mut self) {
        self.striker.state = StrikerState::Idle;
        self.striker.body.respawn_at(Vec2::new(STRIKER_DEFAULT_X, STRIKER_DEFAULT_Y));
        self.striker.reset_timer = 0.0;
        self.slider.handle_x = STRIKER_DEFAULT_X;
        self.aim = None;
    }

    /// Full reset: fresh board, fresh scores, back to player 0
    pub fn reset_game(&mut self) {
        self.setup_coins();
        self.dock_striker();
        for p in &mut self.players {
            p.reset();
        }
        self.current_player = 0;
        self.rotation = 0.0;
        self.turn.reset();
        self.shot_started = false;
        self.first_turn = true;
        self.pending_captures.clear();
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    pub fn opponent_index(&self) -> usize {
        (self.current_player + 1) % self.players.len()
    }

    pub fn opponent_mut(&mut self) -> &mut Player {
        let i = self.opponent_index();
        &mut self.players[i]
    }

    pub fn striker_state(&self) -> StrikerState {
        self.striker.state
    }

    pub fn striker_position(&self) -> Vec2 {
        self.striker.body.pos
    }

    pub fn striker_velocity(&self) -> Vec2 {
        self.striker.body.vel
    }

    /// Points scored so far this turn (display tally)
    pub fn turn_tally(&self) -> i32 {
        self.turn.tally
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain accumulated events for UI feedback
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
