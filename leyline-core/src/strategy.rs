//! Move-choosing strategies and the AI player

use std::fmt;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::game::{GameState, Player};
use crate::minimax::{best_move_recursive, terminal_outcome, Outcome};
use crate::tree::best_move_iterative;

/// Seed used when none is given
const DEFAULT_SEED: u64 = 42;

// ============================================================================
// STRATEGY KINDS
// ============================================================================

/// How an AI player picks its move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Exhaustive recursive minimax
    Recursive,
    /// Exhaustive minimax over an explicit work stack
    Iterative,
    /// One-ply lookahead on [`rough_outcome`]
    Greedy,
    /// Uniformly random legal move
    Random,
}

impl StrategyKind {
    /// True for the strategies that search the whole game tree
    pub fn is_exhaustive(self) -> bool {
        matches!(self, StrategyKind::Recursive | StrategyKind::Iterative)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Recursive => "recursive",
            StrategyKind::Iterative => "iterative",
            StrategyKind::Greedy => "greedy",
            StrategyKind::Random => "random",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ROUGH OUTCOME
// ============================================================================

/// Cheap estimate of the best result the player to move can force.
///
/// - finished position: its terminal outcome
/// - some move wins on the spot: `Win`
/// - every move lets the opponent win on the spot: `Loss`
/// - otherwise `Draw`
pub fn rough_outcome(state: &GameState) -> Outcome {
    if state.is_over() {
        return terminal_outcome(state);
    }

    let me = state.current_player();
    let children: Vec<GameState> = state
        .legal_moves()
        .into_iter()
        .map(|mv| state.apply_move(mv))
        .collect();

    if children.iter().any(|child| child.is_winner(me)) {
        Outcome::Win
    } else if !children.is_empty() && children.iter().all(has_winning_move) {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

/// Whether the player to move can finish the game as winner right now
fn has_winning_move(state: &GameState) -> bool {
    let me = state.current_player();
    state
        .legal_moves()
        .into_iter()
        .any(|mv| state.apply_move(mv).is_winner(me))
}

/// First move leaving the opponent the worst rough outcome
pub fn best_move_greedy(state: &GameState) -> Option<Cell> {
    let mut best: Option<(Cell, Outcome)> = None;
    for mv in state.legal_moves() {
        let guess = -rough_outcome(&state.apply_move(mv));
        if best.map_or(true, |(_, score)| guess > score) {
            best = Some((mv, guess));
        }
    }
    best.map(|(mv, _)| mv)
}

// ============================================================================
// AI PLAYER
// ============================================================================

/// AI player
#[derive(Debug)]
pub struct Ai {
    pub strategy: StrategyKind,
    rng: ChaCha8Rng,
}

impl Ai {
    pub fn new(strategy: StrategyKind) -> Self {
        Self::with_seed(strategy, DEFAULT_SEED)
    }

    pub fn with_seed(strategy: StrategyKind, seed: u64) -> Self {
        Self {
            strategy,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Move for the current position; `None` once the game is over
    pub fn best_move(&mut self, state: &GameState) -> Option<Cell> {
        match self.strategy {
            StrategyKind::Recursive => best_move_recursive(state),
            StrategyKind::Iterative => best_move_iterative(state),
            StrategyKind::Greedy => best_move_greedy(state),
            StrategyKind::Random => state.legal_moves().choose(&mut self.rng).copied(),
        }
    }

    /// Play both sides until the game is over
    pub fn play_game(&mut self, initial: GameState) -> (GameState, Vec<Cell>) {
        let mut state = initial;
        let mut history = Vec::new();

        while let Some(mv) = self.best_move(&state) {
            history.push(mv);
            state = state.apply_move(mv);
        }

        (state, history)
    }
}

/// Play a game between two AI players, `one` moving for player one
pub fn play_versus(initial: GameState, one: &mut Ai, two: &mut Ai) -> (GameState, Vec<Cell>) {
    let mut state = initial;
    let mut history = Vec::new();

    loop {
        let ai = match state.current_player() {
            Player::One => &mut *one,
            Player::Two => &mut *two,
        };
        let Some(mv) = ai.best_move(&state) else {
            break;
        };
        history.push(mv);
        state = state.apply_move(mv);
    }

    (state, history)
}

// ============================================================================
// TESTS
// ============================================================================
