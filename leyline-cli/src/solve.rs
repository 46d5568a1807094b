//! Solve command - evaluate one position with both search formulations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_position(), solve_position(), report_solution()
//! - Level 3: load_snapshot(), replay_moves()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use leyline_core::{
    best_move_iterative, best_move_recursive, evaluate, BoardSize, Cell, Evaluation, GameSnapshot,
    GameState, Outcome, Player,
};

use crate::args::{parse_cell, parse_player, parse_size};

/// Unclaimed cells above which exhaustive search gets slow
const SLOW_SEARCH_CELLS: usize = 9;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SolveArgs {
    /// Board side length (1-5)
    #[arg(long, default_value = "2", value_parser = parse_size)]
    pub size: BoardSize,

    /// Who moves first (p1 or p2)
    #[arg(long, default_value = "p1", value_parser = parse_player)]
    pub first: Player,

    /// Moves to play before solving, e.g. A,C
    #[arg(long, value_delimiter = ',', value_parser = parse_cell)]
    pub moves: Vec<Cell>,

    /// Position snapshot JSON file (replaces --size/--first/--moves)
    #[arg(long, value_name = "FILE", conflicts_with = "moves")]
    pub position: Option<PathBuf>,
}

/// What each search makes of a position
#[derive(Clone, Debug, PartialEq, Eq)]
struct Solution {
    evaluation: Evaluation,
    recursive: Option<Cell>,
    iterative: Option<Cell>,
}

impl Solution {
    fn agrees(&self) -> bool {
        self.recursive == self.iterative
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run solve command
///
/// 1. Build the position
/// 2. Run both searches
/// 3. Report, failing if they disagree
pub fn run(args: SolveArgs) -> Result<()> {
    let state = build_position(&args)?;

    let open_cells = state.cells().filter(|(_, owner)| owner.is_none()).count();
    if open_cells > SLOW_SEARCH_CELLS {
        tracing::warn!("{} open cells; exhaustive search may take a very long time", open_cells);
    }

    let solution = solve_position(&state);

    report_solution(&state, &solution);

    if !solution.agrees() {
        bail!(
            "searches disagree: recursive {}, iterative {}",
            format_move(solution.recursive),
            format_move(solution.iterative)
        );
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_position(args: &SolveArgs) -> Result<GameState> {
    match &args.position {
        Some(path) => load_snapshot(path),
        None => replay_moves(GameState::new(args.size, args.first), &args.moves),
    }
}

fn solve_position(state: &GameState) -> Solution {
    let evaluation = evaluate(state);
    let recursive = best_move_recursive(state);
    let iterative = best_move_iterative(state);

    tracing::info!(
        "Solved: recursive {}, iterative {}",
        format_move(recursive),
        format_move(iterative)
    );

    Solution {
        evaluation,
        recursive,
        iterative,
    }
}

fn report_solution(state: &GameState, solution: &Solution) {
    println!("{}\n", state);

    match &solution.evaluation {
        Evaluation::Terminal(outcome) => {
            println!("Game over: {} for {}", format_outcome(*outcome), state.current_player());
        }
        Evaluation::Moves(values) => {
            println!(
                "{} to move, value {}",
                state.current_player(),
                format_outcome(solution.evaluation.best())
            );
            for (mv, value) in state.legal_moves().iter().zip(values) {
                println!("  {}: {}", mv, format_outcome(*value));
            }
        }
    }

    println!("Recursive choice: {}", format_move(solution.recursive));
    println!("Iterative choice: {}", format_move(solution.iterative));
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn load_snapshot(path: &Path) -> Result<GameState> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read position: {}", path.display()))?;
    let snapshot: GameSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse position: {}", path.display()))?;
    let state = GameState::from_snapshot(&snapshot)
        .with_context(|| format!("Invalid position: {}", path.display()))?;
    Ok(state)
}

fn replay_moves(initial: GameState, moves: &[Cell]) -> Result<GameState> {
    let mut state = initial;
    for (i, mv) in moves.iter().enumerate() {
        state = state
            .make_move(*mv)
            .with_context(|| format!("Move {} ({}) cannot be played", i + 1, mv))?;
    }
    Ok(state)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_move(mv: Option<Cell>) -> String {
    mv.map_or_else(|| "none".to_string(), |cell| cell.to_string())
}

fn format_outcome(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Win => "win",
        Outcome::Draw => "draw",
        Outcome::Loss => "loss",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: u8) -> BoardSize {
        BoardSize::new(n).unwrap()
    }

    #[test]
    fn test_replay_moves() {
        let moves = [Cell::new(0), Cell::new(2)];
        let state = replay_moves(GameState::new(size(2), Player::One), &moves).unwrap();
        assert_eq!(state.cell_owner(Cell::new(0)), Some(Player::One));
        assert_eq!(state.cell_owner(Cell::new(2)), Some(Player::Two));
    }

    #[test]
    fn test_replay_rejects_repeat() {
        let moves = [Cell::new(0), Cell::new(0)];
        let err = replay_moves(GameState::new(size(2), Player::One), &moves).unwrap_err();
        assert!(err.to_string().contains("Move 2"));
    }

    #[test]
    fn test_solution_on_fresh_size_one() {
        let solution = solve_position(&GameState::new(size(1), Player::Two));
        assert!(solution.agrees());
        assert_eq!(solution.recursive, Some(Cell::new(0)));
        assert_eq!(solution.evaluation.best(), Outcome::Win);
    }

    #[test]
    fn test_solution_on_finished_game() {
        let state = GameState::new(size(1), Player::One).make_move(Cell::new(1)).unwrap();
        let solution = solve_position(&state);
        assert_eq!(solution.evaluation, Evaluation::Terminal(Outcome::Loss));
        assert_eq!(solution.recursive, None);
        assert!(solution.agrees());
    }

    #[test]
    fn test_load_snapshot_file() {
        let state = replay_moves(
            GameState::new(size(3), Player::One),
            &[Cell::new(0), Cell::new(5)],
        )
        .unwrap();
        let path = std::env::temp_dir().join(format!("leyline-solve-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string(&state.snapshot()).unwrap()).unwrap();
        let loaded = load_snapshot(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), state);
    }

    #[test]
    fn test_format_move() {
        assert_eq!(format_move(None), "none");
        assert_eq!(format_move(Some(Cell::new(3))), "D");
    }
}
