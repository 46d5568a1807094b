//! Ley-line CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game against a human or AI opponent
//! - solve: Show both searches' choice for a position
//! - verify: Check that both searches agree on every reachable position
//! - match: Run a series of AI-versus-AI games

mod args;
mod match_cmd;
mod play;
mod solve;
mod verify;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "leyline")]
#[command(about = "Ley-line capture game and exhaustive solver")]
struct Cli {
    /// Random seed for reproducible AI play
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game on the terminal
    Play(play::PlayArgs),
    /// Solve a position with both search formulations
    Solve(solve::SolveArgs),
    /// Compare both searches over every reachable position
    Verify(verify::VerifyArgs),
    /// Play a series of AI-versus-AI games
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so board output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Solve(args) => solve::run(args),
        Commands::Verify(args) => verify::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
