//! Verify command - exhaustive agreement check between both searches
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: verify_from(), report_verification()
//! - Level 3: check_state()
//! - Level 4: progress bar utilities

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use leyline_core::{
    best_move_iterative, best_move_recursive, reachable_states, BoardSize, Cell, GameSnapshot,
    GameState, Player,
};

use crate::args::{parse_player, parse_size};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct VerifyArgs {
    /// Board side length (1-5); only 1 and 2 finish quickly
    #[arg(long, default_value = "2", value_parser = parse_size)]
    pub size: BoardSize,

    /// Only check games where this player moves first (default: both)
    #[arg(long, value_parser = parse_player)]
    pub first: Option<Player>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// A position where the two searches chose differently
#[derive(Clone, Debug)]
struct Disagreement {
    position: GameSnapshot,
    recursive: Option<Cell>,
    iterative: Option<Cell>,
}

/// Totals for one starting position
#[derive(Clone, Debug, Default)]
struct VerifyReport {
    states: usize,
    terminal: usize,
    /// States whose legal moves were not the unclaimed cells
    bad_move_lists: usize,
    disagreements: Vec<Disagreement>,
}

impl VerifyReport {
    fn passed(&self) -> bool {
        self.bad_move_lists == 0 && self.disagreements.is_empty()
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run verify command
///
/// 1. Enumerate the positions reachable from each starting player
/// 2. Run both searches on every unfinished one
/// 3. Report, failing on any disagreement
pub fn run(args: VerifyArgs) -> Result<()> {
    let firsts = match args.first {
        Some(player) => vec![player],
        None => vec![Player::One, Player::Two],
    };

    let mut failed = 0;
    for first in firsts {
        let root = GameState::new(args.size, first);
        tracing::info!("Verifying size {} with {} first", args.size, first);

        let report = verify_from(&root, !args.quiet);
        report_verification(args.size, first, &report);

        if !report.passed() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("verification failed for {} starting position(s)", failed);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn verify_from(root: &GameState, show_progress: bool) -> VerifyReport {
    let states = reachable_states(root);
    let pb = if show_progress {
        create_progress_bar(states.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut report = VerifyReport {
        states: states.len(),
        ..Default::default()
    };

    for state in &states {
        if state.is_over() {
            report.terminal += 1;
        }
        if !moves_match_open_cells(state) {
            report.bad_move_lists += 1;
        }
        if let Some(disagreement) = check_state(state) {
            tracing::warn!(?disagreement, "searches disagree");
            report.disagreements.push(disagreement);
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    report
}

fn report_verification(size: BoardSize, first: Player, report: &VerifyReport) {
    println!("=== Size {}, {} first ===", size, first);
    println!("Reachable states: {}", report.states);
    println!("Terminal states:  {}", report.terminal);
    println!("Searched states:  {}", report.states - report.terminal);
    println!("Bad move lists:   {}", report.bad_move_lists);
    println!("Disagreements:    {}", report.disagreements.len());

    for d in &report.disagreements {
        println!(
            "  cells {} lines {} ({} to move): recursive {:?}, iterative {:?}",
            d.position.cells,
            d.position.ley_lines,
            d.position.current_player,
            d.recursive,
            d.iterative
        );
    }

    println!("{}", if report.passed() { "OK" } else { "FAILED" });
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Compare both searches on one position
fn check_state(state: &GameState) -> Option<Disagreement> {
    let recursive = best_move_recursive(state);
    let iterative = best_move_iterative(state);
    (recursive != iterative).then(|| Disagreement {
        position: state.snapshot(),
        recursive,
        iterative,
    })
}

/// Legal moves are the unclaimed cells, and there are none once over
fn moves_match_open_cells(state: &GameState) -> bool {
    let moves = state.legal_moves();
    if state.is_over() {
        return moves.is_empty();
    }
    let open: Vec<Cell> = state
        .cells()
        .filter(|(_, owner)| owner.is_none())
        .map(|(cell, _)| cell)
        .collect();
    !moves.is_empty() && moves == open
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    match ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} states ({per_sec})")
    {
        Ok(style) => pb.set_style(style.progress_chars("=>-")),
        Err(e) => tracing::debug!("default progress style: {}", e),
    }
    pb
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_size_one() {
        for first in [Player::One, Player::Two] {
            let root = GameState::new(BoardSize::new(1).unwrap(), first);
            let report = verify_from(&root, false);
            assert_eq!(report.states, 4);
            assert_eq!(report.terminal, 3);
            assert!(report.passed());
        }
    }

    #[test]
    fn test_verify_size_two() {
        let root = GameState::new(BoardSize::new(2).unwrap(), Player::One);
        let report = verify_from(&root, false);
        assert!(report.terminal > 0);
        assert_eq!(report.bad_move_lists, 0);
        assert!(report.disagreements.is_empty());
    }

    #[test]
    fn test_check_state_terminal() {
        let state = GameState::new(BoardSize::new(1).unwrap(), Player::One)
            .make_move(Cell::new(2))
            .unwrap();
        assert!(check_state(&state).is_none());
        assert!(moves_match_open_cells(&state));
    }
}
