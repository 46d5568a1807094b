//! Ley-line Core - Game engine and exhaustive search
//!
//! This crate provides the core game logic for ley-line capture:
//! - Board topology (cells and ley-lines for side lengths 1-5)
//! - Immutable game state with the capture transition
//! - Terminal detection and winner evaluation
//! - Recursive and iterative minimax that agree on every move
//! - Greedy and random strategies for boards too large to solve

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod minimax;
pub mod render;
pub mod strategy;
pub mod tree;

// Re-exports for convenient access
pub use board::{Axis, BoardSize, Cell, LeyLine, LeyLineId, Topology, MAX_SIZE, MIN_SIZE};
pub use config::{Controller, GameConfig};
pub use error::GameError;
pub use game::{GameResult, GameSnapshot, GameState, Player};
pub use minimax::{best_move_recursive, evaluate, reachable_states, Evaluation, Outcome};
pub use strategy::{best_move_greedy, play_versus, rough_outcome, Ai, StrategyKind};
pub use tree::{best_move_iterative, SearchTree};
