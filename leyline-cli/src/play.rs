//! Play command - a game on the terminal between humans and/or AIs
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: resolve_config(), play_game(), announce_result()
//! - Level 3: human_turn(), ai_turn()
//! - Level 4: prompt/input utilities

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use leyline_core::{Ai, BoardSize, Cell, Controller, GameConfig, GameResult, GameState, Player};

use crate::args::{parse_controller, parse_player, parse_size};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Board side length (1-5)
    #[arg(long, value_parser = parse_size)]
    pub size: Option<BoardSize>,

    /// Who moves first (p1 or p2)
    #[arg(long, value_parser = parse_player)]
    pub first: Option<Player>,

    /// Player one: human, recursive, iterative, greedy or random
    #[arg(long, value_parser = parse_controller)]
    pub p1: Option<Controller>,

    /// Player two: human, recursive, iterative, greedy or random
    #[arg(long, value_parser = parse_controller)]
    pub p2: Option<Controller>,

    /// Game config JSON file (flags override its fields)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// The two AI players, `None` for human-controlled sides
struct Seats {
    one: Option<Ai>,
    two: Option<Ai>,
}

impl Seats {
    fn new(config: &GameConfig, seed: Option<u64>) -> Self {
        let seat = |controller: Controller, offset: u64| {
            controller.strategy().map(|strategy| match config.seed.or(seed) {
                Some(s) => Ai::with_seed(strategy, s.wrapping_add(offset)),
                None => Ai::new(strategy),
            })
        };
        Self {
            one: seat(config.player_one, 0),
            two: seat(config.player_two, 1),
        }
    }

    fn get_mut(&mut self, player: Player) -> Option<&mut Ai> {
        match player {
            Player::One => self.one.as_mut(),
            Player::Two => self.two.as_mut(),
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Merge the config file with command-line flags
/// 2. Play until the game is over
/// 3. Announce the result
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = resolve_config(&args)?;

    tracing::info!(
        "Starting game: size {}, {} first, p1={:?} p2={:?}",
        config.size,
        config.first_player,
        config.player_one,
        config.player_two
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let final_state = play_game(&config, seed, &mut stdin.lock(), &mut stdout.lock())?;

    announce_result(&final_state, &mut io::stdout().lock())?;

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Config file (or defaults) with any flags applied on top
fn resolve_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load game config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(size) = args.size {
        config.size = size.get();
    }
    if let Some(first) = args.first {
        config.first_player = first;
    }
    if let Some(p1) = args.p1 {
        config.player_one = p1;
    }
    if let Some(p2) = args.p2 {
        config.player_two = p2;
    }

    let size = config.board_size()?;
    for controller in [config.player_one, config.player_two] {
        if controller.strategy().is_some_and(|s| s.is_exhaustive()) && size.get() > 2 {
            tracing::warn!(
                "{:?} search on a size {} board may take a very long time",
                controller,
                size
            );
        }
    }

    Ok(config)
}

/// Alternate turns until the game is over, returning the final position
fn play_game<R: BufRead, W: Write>(
    config: &GameConfig,
    seed: Option<u64>,
    input: &mut R,
    output: &mut W,
) -> Result<GameState> {
    let mut state = config.initial_state()?;
    let mut seats = Seats::new(config, seed);

    while !state.is_over() {
        let player = state.current_player();
        let mv = match seats.get_mut(player) {
            Some(ai) => ai_turn(ai, &state, output)?,
            None => human_turn(&state, input, output)?,
        };
        state = state.make_move(mv)?;
    }

    writeln!(output, "\n{}", state)?;
    Ok(state)
}

fn announce_result<W: Write>(state: &GameState, output: &mut W) -> Result<()> {
    match state.result() {
        GameResult::Ongoing => bail!("game stopped before it was over"),
        GameResult::Undecided => writeln!(output, "Game over with no winner")?,
        result => {
            if let Some(winner) = result.winner() {
                writeln!(output, "{} wins", winner)?;
            }
        }
    }
    writeln!(
        output,
        "Ley-lines: p1 {}, p2 {}",
        state.captured(Player::One),
        state.captured(Player::Two)
    )?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Prompt until the human enters a playable cell
fn human_turn<R: BufRead, W: Write>(state: &GameState, input: &mut R, output: &mut W) -> Result<Cell> {
    writeln!(output, "\n{}", state)?;
    loop {
        let line = prompt(state.current_player(), input, output)?;
        let attempt = line
            .parse::<Cell>()
            .and_then(|cell| state.make_move(cell).map(|_| cell));
        match attempt {
            Ok(cell) => return Ok(cell),
            Err(e) => writeln!(output, "{}, try again", e)?,
        }
    }
}

fn ai_turn<W: Write>(ai: &mut Ai, state: &GameState, output: &mut W) -> Result<Cell> {
    let Some(mv) = ai.best_move(state) else {
        bail!("{} search returned no move for a game in progress", ai.strategy);
    };
    tracing::debug!(player = %state.current_player(), %mv, "ai move");
    writeln!(output, "{} ({}) plays {}", state.current_player(), ai.strategy, mv)?;
    Ok(mv)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Read one line of input; end of input is an error
fn prompt<R: BufRead, W: Write>(player: Player, input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{} to move: ", player)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("input closed before the game was over");
    }
    Ok(line)
}

// ============================================================================
// TESTS
// ============================================================================
