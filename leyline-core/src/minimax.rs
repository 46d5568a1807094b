//! Exhaustive recursive minimax (negamax form)
//!
//! Scores are always from the perspective of the player to move in the
//! position being scored; a child's score is negated on the way up.

use std::ops::Neg;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::game::GameState;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Game-theoretic value of a position for the player to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Loss = -1,
    Draw = 0,
    Win = 1,
}

impl Outcome {
    pub fn value(self) -> i8 {
        self as i8
    }
}

impl Neg for Outcome {
    type Output = Outcome;

    fn neg(self) -> Outcome {
        match self {
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
            Outcome::Win => Outcome::Loss,
        }
    }
}

/// Outcome of a finished position for its player to move
pub fn terminal_outcome(state: &GameState) -> Outcome {
    let me = state.current_player();
    if state.is_winner(me) {
        Outcome::Win
    } else if state.is_winner(me.opponent()) {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

/// Index of the move to play given per-move values.
///
/// The first forced win if there is one; otherwise the last move among those
/// sharing the best value. Both search formulations choose through this.
pub fn select_index(values: &[Outcome]) -> Option<usize> {
    if let Some(i) = values.iter().position(|v| *v == Outcome::Win) {
        return Some(i);
    }
    let best = values.iter().copied().max()?;
    values.iter().rposition(|v| *v == best)
}

// ============================================================================
// RECURSIVE SEARCH
// ============================================================================

/// Result of a full recursive evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluation {
    /// The position is over
    Terminal(Outcome),
    /// One value per legal move, in move order
    Moves(Vec<Outcome>),
}

impl Evaluation {
    /// Best value reachable for the player to move.
    ///
    /// A non-terminal position without moves cannot arise from legal play;
    /// it is scored as a draw.
    pub fn best(&self) -> Outcome {
        match self {
            Evaluation::Terminal(outcome) => *outcome,
            Evaluation::Moves(values) => values.iter().copied().max().unwrap_or(Outcome::Draw),
        }
    }
}

/// Exhaustively evaluate `state`
pub fn evaluate(state: &GameState) -> Evaluation {
    if state.is_over() {
        return Evaluation::Terminal(terminal_outcome(state));
    }
    Evaluation::Moves(branch_values(state))
}

#[cfg(not(feature = "parallel"))]
fn branch_values(state: &GameState) -> Vec<Outcome> {
    state
        .legal_moves()
        .into_iter()
        .map(|mv| -evaluate(&state.apply_move(mv)).best())
        .collect()
}

/// Sibling branches only read the parent, so they fan out across rayon's
/// pool; `collect` keeps move order.
#[cfg(feature = "parallel")]
fn branch_values(state: &GameState) -> Vec<Outcome> {
    use rayon::prelude::*;

    state
        .legal_moves()
        .into_par_iter()
        .map(|mv| -evaluate(&state.apply_move(mv)).best())
        .collect()
}

/// Best move by recursive minimax; `None` when the game is already over
pub fn best_move_recursive(state: &GameState) -> Option<Cell> {
    let Evaluation::Moves(values) = evaluate(state) else {
        return None;
    };
    let moves = state.legal_moves();
    let chosen = select_index(&values).and_then(|i| moves.get(i).copied());
    tracing::debug!(?values, ?chosen, "recursive minimax finished");
    chosen
}

// ============================================================================
// REACHABLE STATES
// ============================================================================

/// Every distinct state reachable from `root` by legal moves, `root` first
pub fn reachable_states(root: &GameState) -> Vec<GameState> {
    let mut seen = FxHashSet::default();
    let mut order = Vec::new();
    let mut pending = vec![*root];
    seen.insert(*root);

    while let Some(state) = pending.pop() {
        order.push(state);
        for mv in state.legal_moves() {
            let next = state.apply_move(mv);
            if seen.insert(next) {
                pending.push(next);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSize;
    use crate::game::Player;

    fn fresh(size: u8) -> GameState {
        GameState::new(BoardSize::new(size).unwrap(), Player::One)
    }

    #[test]
    fn test_outcome_negation_and_order() {
        assert_eq!(-Outcome::Win, Outcome::Loss);
        assert_eq!(-Outcome::Loss, Outcome::Win);
        assert_eq!(-Outcome::Draw, Outcome::Draw);
        assert!(Outcome::Loss < Outcome::Draw && Outcome::Draw < Outcome::Win);
        assert_eq!(Outcome::Loss.value(), -1);
    }

    #[test]
    fn test_select_index() {
        use Outcome::*;
        assert_eq!(select_index(&[Loss, Win, Win]), Some(1));
        assert_eq!(select_index(&[Loss, Loss, Loss]), Some(2));
        assert_eq!(select_index(&[Draw, Loss, Draw, Loss]), Some(2));
        assert_eq!(select_index(&[]), None);
    }

    #[test]
    fn test_terminal_outcome_after_winning_move() {
        let game = fresh(1).make_move(Cell::new(2)).unwrap();
        // p1 just won; p2 is to move and has lost
        assert_eq!(terminal_outcome(&game), Outcome::Loss);
        assert_eq!(evaluate(&game), Evaluation::Terminal(Outcome::Loss));
        assert_eq!(best_move_recursive(&game), None);
    }

    #[test]
    fn test_size_one_every_move_wins() {
        let game = fresh(1);
        assert_eq!(
            evaluate(&game),
            Evaluation::Moves(vec![Outcome::Win, Outcome::Win, Outcome::Win])
        );
        assert_eq!(best_move_recursive(&game), Some(Cell::new(0)));
    }

    #[test]
    fn test_takes_immediate_win() {
        // Size 2 after A C D F: p1 holds /1 -1 \2. B and E reach the five
        // lines needed at once; G wins one reply later whatever p2 does.
        let game = "ACDF".chars().fold(fresh(2), |s, l| {
            s.make_move(Cell::from_letter(l).unwrap()).unwrap()
        });
        assert!(!game.is_over());
        assert_eq!(game.captured(Player::One), 3);
        assert_eq!(
            evaluate(&game),
            Evaluation::Moves(vec![Outcome::Win, Outcome::Win, Outcome::Win])
        );
        let mv = best_move_recursive(&game).unwrap();
        assert_eq!(mv, Cell::from_letter('B').unwrap());
        assert!(game.make_move(mv).unwrap().is_winner(Player::One));
    }

    #[test]
    fn test_reachable_states_size_one() {
        let states = reachable_states(&fresh(1));
        // Root plus one finished state per first move
        assert_eq!(states.len(), 4);
        assert_eq!(states[0], fresh(1));
        assert!(states[1..].iter().all(GameState::is_over));
    }

    #[test]
    fn test_reachable_states_are_distinct() {
        let states = reachable_states(&fresh(2));
        let unique: FxHashSet<_> = states.iter().copied().collect();
        assert_eq!(unique.len(), states.len());
        assert!(states.len() > 100);
    }
}
