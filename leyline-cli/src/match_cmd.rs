//! Match command - play a series of games between two AI strategies
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use leyline_core::{play_versus, Ai, BoardSize, Cell, GameResult, GameState, Player, StrategyKind};

use crate::args::{parse_size, parse_strategy};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Board side length (1-5)
    #[arg(long, default_value = "3", value_parser = parse_size)]
    pub size: BoardSize,

    /// Number of games to play (first player alternates)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Player one strategy: recursive, iterative, greedy or random
    #[arg(long, default_value = "greedy", value_parser = parse_strategy)]
    pub p1: StrategyKind,

    /// Player two strategy: recursive, iterative, greedy or random
    #[arg(long, default_value = "random", value_parser = parse_strategy)]
    pub p2: StrategyKind,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    first_player: Player,
    result: GameResult,
    moves: Vec<Cell>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    p1_wins: usize,
    p2_wins: usize,
    undecided: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Play the match (multiple games)
/// 2. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting match: {} vs {} ({} games, size {})",
        args.p1,
        args.p2,
        args.games,
        args.size
    );

    let results = play_match(&args, seed);

    report_results(&results, &args)?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, seed: Option<u64>) -> MatchResults {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        // Alternate who opens for fairness
        let first = if game_num % 2 == 0 { Player::One } else { Player::Two };

        let record = play_single_game(args, first, game_num + 1, &mut rng);

        tracing::info!(
            "Game {}: {:?} ({} moves, {} first)",
            record.game_number,
            record.result,
            record.moves.len(),
            record.first_player
        );

        games.push(record);
    }

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        print_json_results(results, args)?;
    } else {
        print_text_results(results, args);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; each AI gets its own seed drawn from the match RNG
fn play_single_game(
    args: &MatchArgs,
    first: Player,
    game_number: usize,
    rng: &mut ChaCha8Rng,
) -> GameRecord {
    let mut one = Ai::with_seed(args.p1, rng.gen());
    let mut two = Ai::with_seed(args.p2, rng.gen());

    let (final_state, moves) = play_versus(GameState::new(args.size, first), &mut one, &mut two);

    GameRecord {
        game_number,
        first_player: first,
        result: final_state.result(),
        moves,
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();
    let p1_wins = count(GameResult::PlayerOneWins);
    let p2_wins = count(GameResult::PlayerTwoWins);
    let undecided = count(GameResult::Undecided);

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        games,
        p1_wins,
        p2_wins,
        undecided,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn format_moves(moves: &[Cell]) -> String {
    moves.iter().map(|mv| mv.letter()).collect()
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first_player: Player,
        result: GameResult,
        moves: String,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        size: u8,
        p1: StrategyKind,
        p2: StrategyKind,
        total_games: usize,
        p1_wins: usize,
        p2_wins: usize,
        undecided: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        size: args.size.get(),
        p1: args.p1,
        p2: args.p2,
        total_games: results.games.len(),
        p1_wins: results.p1_wins,
        p2_wins: results.p2_wins,
        undecided: results.undecided,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first_player: g.first_player,
                result: g.result,
                moves: format_moves(&g.moves),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results: {} vs {} (size {}) ===", args.p1, args.p2, args.size);
    println!("Total games: {}", total);
    println!(
        "P1 wins:     {} ({:.1}%)",
        results.p1_wins,
        percent(results.p1_wins, total)
    );
    println!(
        "P2 wins:     {} ({:.1}%)",
        results.p2_wins,
        percent(results.p2_wins, total)
    );
    println!(
        "Undecided:   {} ({:.1}%)",
        results.undecided,
        percent(results.undecided, total)
    );
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} moves ({} first: {})",
            game.game_number,
            game.result,
            game.moves.len(),
            game.first_player,
            format_moves(&game.moves)
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(size: u8, games: usize, p1: StrategyKind, p2: StrategyKind) -> MatchArgs {
        MatchArgs {
            size: BoardSize::new(size).unwrap(),
            games,
            p1,
            p2,
            json: false,
        }
    }

    fn record(game_number: usize, result: GameResult, moves: usize) -> GameRecord {
        GameRecord {
            game_number,
            first_player: Player::One,
            result,
            moves: vec![Cell::new(0); moves],
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.p1_wins, 0);
        assert_eq!(results.p2_wins, 0);
        assert_eq!(results.undecided, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameResult::PlayerOneWins, 4),
            record(2, GameResult::PlayerTwoWins, 6),
            record(3, GameResult::PlayerOneWins, 5),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.p1_wins, 2);
        assert_eq!(results.p2_wins, 1);
        assert_eq!(results.undecided, 0);
        assert_eq!(results.avg_moves, 5.0);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }

    #[test]
    fn test_match_alternates_first_player() {
        let results = play_match(&args(3, 4, StrategyKind::Greedy, StrategyKind::Random), Some(5));
        assert_eq!(results.games.len(), 4);
        let firsts: Vec<Player> = results.games.iter().map(|g| g.first_player).collect();
        assert_eq!(firsts, vec![Player::One, Player::Two, Player::One, Player::Two]);
        assert!(results.games.iter().all(|g| g.result != GameResult::Ongoing));
    }

    #[test]
    fn test_match_is_reproducible() {
        let a = play_match(&args(4, 3, StrategyKind::Random, StrategyKind::Random), Some(9));
        let b = play_match(&args(4, 3, StrategyKind::Random, StrategyKind::Random), Some(9));
        let moves = |r: &MatchResults| r.games.iter().map(|g| g.moves.clone()).collect::<Vec<_>>();
        assert_eq!(moves(&a), moves(&b));
    }

    #[test]
    fn test_size_one_opener_always_wins() {
        let results = play_match(&args(1, 2, StrategyKind::Iterative, StrategyKind::Recursive), Some(1));
        assert_eq!(results.games[0].result, GameResult::PlayerOneWins);
        assert_eq!(results.games[1].result, GameResult::PlayerTwoWins);
        assert_eq!(results.avg_moves, 1.0);
    }
}
