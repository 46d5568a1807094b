//! Game state, capture transition and terminal evaluation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{BoardSize, Cell, LeyLine, LeyLineId, Topology, MAX_CELLS, MAX_LINES};
use crate::error::GameError;

/// Marker used for an unowned ley-line
pub const UNOWNED_LINE: char = '@';

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "p1")]
    One,
    #[serde(rename = "p2")]
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Board marker for cells and lines owned by this player
    pub fn marker(self) -> char {
        match self {
            Player::One => '1',
            Player::Two => '2',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '1' => Some(Player::One),
            '2' => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "p1"),
            Player::Two => write!(f, "p2"),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    PlayerOneWins,
    PlayerTwoWins,
    /// Over, but neither side satisfies [`GameState::is_winner`]
    Undecided,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::PlayerOneWins => Some(Player::One),
            GameResult::PlayerTwoWins => Some(Player::Two),
            GameResult::Ongoing | GameResult::Undecided => None,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable game position.
///
/// Ownership lives in fixed-size arrays sized for the largest board, so a
/// state is a plain `Copy` value and every move yields an independent one.
/// Slots past the current board's cell and line counts stay `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    size: BoardSize,
    cells: [Option<Player>; MAX_CELLS],
    lines: [Option<Player>; MAX_LINES],
    current_player: Player,
}

impl GameState {
    /// Fresh board: every cell and ley-line unclaimed
    pub fn new(size: BoardSize, first: Player) -> Self {
        Self {
            size,
            cells: [None; MAX_CELLS],
            lines: [None; MAX_LINES],
            current_player: first,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn topology(&self) -> &'static Topology {
        self.size.topology()
    }

    /// Player to move
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Owner of a cell (`None` when unclaimed or not on this board)
    pub fn cell_owner(&self, cell: Cell) -> Option<Player> {
        if self.topology().contains(cell) {
            self.cells[cell.index()]
        } else {
            None
        }
    }

    /// Cells of this board with their owners, in canonical order
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Option<Player>)> + '_ {
        self.topology().cells().map(|cell| (cell, self.cells[cell.index()]))
    }

    pub fn line_owner(&self, id: LeyLineId) -> Option<Player> {
        self.topology().line_index(id).and_then(|i| self.lines[i])
    }

    /// Ley-lines of this board with their owners, in canonical order
    pub fn lines(&self) -> impl Iterator<Item = (&'static LeyLine, Option<Player>)> + '_ {
        self.topology().lines().iter().zip(self.lines.iter().copied())
    }

    /// Number of ley-lines captured by `player`
    pub fn captured(&self, player: Player) -> usize {
        self.lines.iter().filter(|owner| **owner == Some(player)).count()
    }

    // ========================================================================
    // TERMINAL EVALUATION
    // ========================================================================

    /// True once either player holds at least half of the ley-lines
    pub fn is_over(&self) -> bool {
        let need = self.topology().lines_to_win();
        self.captured(Player::One) >= need || self.captured(Player::Two) >= need
    }

    /// True when the game is over, `player` is *not* the one to move, and
    /// `player` holds strictly more ley-lines than the opponent.
    ///
    /// The turn condition is part of the rule: a player can only be the
    /// winner of a position their opponent has to move in.
    pub fn is_winner(&self, player: Player) -> bool {
        self.is_over()
            && self.current_player == player.opponent()
            && self.captured(player) > self.captured(player.opponent())
    }

    pub fn result(&self) -> GameResult {
        if !self.is_over() {
            GameResult::Ongoing
        } else if self.is_winner(Player::One) {
            GameResult::PlayerOneWins
        } else if self.is_winner(Player::Two) {
            GameResult::PlayerTwoWins
        } else {
            GameResult::Undecided
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Unclaimed cells in canonical order; empty once the game is over
    pub fn legal_moves(&self) -> Vec<Cell> {
        if self.is_over() {
            return vec![];
        }
        self.cells()
            .filter(|(_, owner)| owner.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    // ========================================================================
    // MOVE APPLICATION
    // ========================================================================

    /// Claim `cell` for the player to move and return the resulting state.
    ///
    /// Fails without touching `self` when the cell is off this board or
    /// already claimed.
    pub fn make_move(&self, cell: Cell) -> Result<GameState, GameError> {
        if !self.topology().contains(cell) {
            return Err(GameError::CellOffBoard {
                cell,
                size: self.size.get(),
            });
        }
        if self.cells[cell.index()].is_some() {
            return Err(GameError::CellClaimed { cell });
        }
        Ok(self.apply_move(cell))
    }

    /// Unchecked transition; `cell` must be an unclaimed cell of this board.
    pub(crate) fn apply_move(&self, cell: Cell) -> GameState {
        let mover = self.current_player;
        let mut next = *self;
        next.cells[cell.index()] = Some(mover);
        next.current_player = mover.opponent();

        let cells = next.cells;
        for (owner, line) in next.lines.iter_mut().zip(self.topology().lines()) {
            if owner.is_some() {
                continue;
            }
            let held = line
                .members()
                .filter(|m| cells[m.index()] == Some(mover))
                .count();
            if held >= line.threshold() {
                *owner = Some(mover);
            }
        }

        next
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.size.get(),
            current_player: self.current_player,
            cells: self
                .cells()
                .map(|(cell, owner)| owner.map_or(cell.letter(), Player::marker))
                .collect(),
            ley_lines: self
                .lines()
                .map(|(_, owner)| owner.map_or(UNOWNED_LINE, Player::marker))
                .collect(),
        }
    }

    /// Rebuild a state from its snapshot.
    ///
    /// Only the encoding is validated; the ownership it describes does not
    /// have to be reachable by legal play.
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self, GameError> {
        let size = BoardSize::new(snapshot.size)?;
        let topology = size.topology();
        let mut state = GameState::new(size, snapshot.current_player);

        let cell_markers: Vec<char> = snapshot.cells.chars().collect();
        if cell_markers.len() != topology.cell_count() {
            return Err(GameError::InvalidSnapshot(format!(
                "expected {} cells, found {}",
                topology.cell_count(),
                cell_markers.len()
            )));
        }
        for (cell, marker) in topology.cells().zip(cell_markers) {
            state.cells[cell.index()] = match Player::from_marker(marker) {
                Some(player) => Some(player),
                None if marker.to_ascii_uppercase() == cell.letter() => None,
                None => {
                    return Err(GameError::InvalidSnapshot(format!(
                        "cell {} has marker {:?}",
                        cell, marker
                    )))
                }
            };
        }

        let line_markers: Vec<char> = snapshot.ley_lines.chars().collect();
        if line_markers.len() != topology.line_count() {
            return Err(GameError::InvalidSnapshot(format!(
                "expected {} ley-lines, found {}",
                topology.line_count(),
                line_markers.len()
            )));
        }
        for (i, (line, marker)) in topology.lines().iter().zip(line_markers).enumerate() {
            state.lines[i] = match Player::from_marker(marker) {
                Some(player) => Some(player),
                None if marker == UNOWNED_LINE => None,
                None => {
                    return Err(GameError::InvalidSnapshot(format!(
                        "ley-line {} has marker {:?}",
                        line.id, marker
                    )))
                }
            };
        }

        Ok(state)
    }
}

/// Serializable encoding of a [`GameState`].
///
/// `cells` lists one marker per cell in canonical order (the cell's own
/// letter when unclaimed, otherwise `1` or `2`); `ley_lines` lists one marker
/// per line in topology order (`@`, `1` or `2`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: u8,
    pub current_player: Player,
    pub cells: String,
    pub ley_lines: String,
}

// ============================================================================
// TESTS
// ============================================================================
