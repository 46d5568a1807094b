//! Board topology: cells and ley-lines for every supported side length

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Smallest supported side length
pub const MIN_SIZE: u8 = 1;

/// Largest supported side length
pub const MAX_SIZE: u8 = 5;

/// Cell count of the largest board
pub const MAX_CELLS: usize = 25;

/// Ley-line count of the largest board (3 * MAX_SIZE + 3)
pub const MAX_LINES: usize = 18;

// ============================================================================
// BOARD SIZE
// ============================================================================

/// Side length of the triangular board, always within 1..=5
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoardSize(u8);

impl BoardSize {
    pub fn new(side: u8) -> Result<Self, GameError> {
        if (MIN_SIZE..=MAX_SIZE).contains(&side) {
            Ok(Self(side))
        } else {
            Err(GameError::UnsupportedSize(side))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every supported size, smallest first
    pub fn all() -> impl Iterator<Item = BoardSize> {
        (MIN_SIZE..=MAX_SIZE).map(BoardSize)
    }

    /// Static topology for this size
    pub fn topology(self) -> &'static Topology {
        &TOPOLOGIES[(self.0 - MIN_SIZE) as usize]
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(side: u8) -> Result<Self, Self::Error> {
        Self::new(side)
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.0
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CELLS
// ============================================================================

/// A claimable cell, identified by its letter (`A` is index 0)
///
/// A `Cell` is only a name; whether it exists on a given board is checked
/// against that board's [`Topology`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Cell(u8);

impl Cell {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Cell for an ASCII letter, case-insensitive
    pub fn from_letter(letter: char) -> Option<Self> {
        if letter.is_ascii_alphabetic() {
            Some(Self(letter.to_ascii_uppercase() as u8 - b'A'))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn letter(self) -> char {
        (b'A' + self.0) as char
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Parse a human-entered move token.
///
/// Surrounding whitespace is ignored and case does not matter. Anything other
/// than a single letter is rejected.
impl FromStr for Cell {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Cell::from_letter(letter)
                .ok_or_else(|| GameError::InvalidMoveToken(trimmed.to_string())),
            _ => Err(GameError::InvalidMoveToken(trimmed.to_string())),
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = GameError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        Cell::from_letter(letter).ok_or_else(|| GameError::InvalidMoveToken(letter.to_string()))
    }
}

impl From<Cell> for char {
    fn from(cell: Cell) -> Self {
        cell.letter()
    }
}

// ============================================================================
// LEY-LINES
// ============================================================================

/// Orientation of a ley-line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// `/`
    Rising,
    /// `\`
    Falling,
    /// `-`
    Row,
}

impl Axis {
    pub fn symbol(self) -> char {
        match self {
            Axis::Rising => '/',
            Axis::Falling => '\\',
            Axis::Row => '-',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '/' => Some(Axis::Rising),
            '\\' => Some(Axis::Falling),
            '-' => Some(Axis::Row),
            _ => None,
        }
    }
}

/// Ley-line identifier, e.g. `/2` or `-1` (numbers start at 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeyLineId {
    pub axis: Axis,
    pub number: u8,
}

impl LeyLineId {
    pub const fn new(axis: Axis, number: u8) -> Self {
        Self { axis, number }
    }
}

impl fmt::Display for LeyLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.axis.symbol(), self.number)
    }
}

/// A scoring line: its member cells and the count needed to capture it
#[derive(Clone, Debug)]
pub struct LeyLine {
    pub id: LeyLineId,
    /// Member cell letters
    members: &'static str,
    threshold: u8,
}

impl LeyLine {
    const fn new(axis: Axis, number: u8, members: &'static str) -> Self {
        Self {
            id: LeyLineId::new(axis, number),
            members,
            threshold: members.len().div_ceil(2) as u8,
        }
    }

    /// Member cells in table order
    pub fn members(&self) -> impl Iterator<Item = Cell> + '_ {
        self.members.bytes().map(|b| Cell(b - b'A'))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members one player must own to capture this line
    pub fn threshold(&self) -> usize {
        self.threshold as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.members().any(|m| m == cell)
    }
}

// ============================================================================
// TOPOLOGY TABLE
// ============================================================================

/// Cells and ley-lines of one board size
#[derive(Debug)]
pub struct Topology {
    size: u8,
    cell_count: usize,
    lines: &'static [LeyLine],
}

impl Topology {
    const fn new(size: u8, cell_count: usize, lines: &'static [LeyLine]) -> Self {
        Self { size, cell_count, lines }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Cells in canonical (alphabetical) order
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        (0..self.cell_count as u8).map(Cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.index() < self.cell_count
    }

    /// Ley-lines in canonical order: `/` lines, then `\`, then `-`
    pub fn lines(&self) -> &'static [LeyLine] {
        self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Position of a ley-line within [`Topology::lines`]
    pub fn line_index(&self, id: LeyLineId) -> Option<usize> {
        self.lines.iter().position(|line| line.id == id)
    }

    /// Captured lines a player needs to end the game: ceil(L / 2)
    pub fn lines_to_win(&self) -> usize {
        self.lines.len().div_ceil(2)
    }
}

use Axis::{Falling, Rising, Row};

const SIZE_1_LINES: [LeyLine; 6] = [
    LeyLine::new(Rising, 1, "A"),
    LeyLine::new(Rising, 2, "BC"),
    LeyLine::new(Falling, 1, "AC"),
    LeyLine::new(Falling, 2, "B"),
    LeyLine::new(Row, 1, "AB"),
    LeyLine::new(Row, 2, "C"),
];

const SIZE_2_LINES: [LeyLine; 9] = [
    LeyLine::new(Rising, 1, "AC"),
    LeyLine::new(Rising, 2, "BDF"),
    LeyLine::new(Rising, 3, "EG"),
    LeyLine::new(Falling, 1, "CF"),
    LeyLine::new(Falling, 2, "ADG"),
    LeyLine::new(Falling, 3, "BE"),
    LeyLine::new(Row, 1, "AB"),
    LeyLine::new(Row, 2, "CDE"),
    LeyLine::new(Row, 3, "FG"),
];

const SIZE_3_LINES: [LeyLine; 12] = [
    LeyLine::new(Rising, 1, "ACF"),
    LeyLine::new(Rising, 2, "BDGJ"),
    LeyLine::new(Rising, 3, "EHK"),
    LeyLine::new(Rising, 4, "IL"),
    LeyLine::new(Falling, 1, "FJ"),
    LeyLine::new(Falling, 2, "CGK"),
    LeyLine::new(Falling, 3, "ADHL"),
    LeyLine::new(Falling, 4, "BEI"),
    LeyLine::new(Row, 1, "AB"),
    LeyLine::new(Row, 2, "CDE"),
    LeyLine::new(Row, 3, "FGHI"),
    LeyLine::new(Row, 4, "JKL"),
];

const SIZE_4_LINES: [LeyLine; 15] = [
    LeyLine::new(Rising, 1, "ACFJ"),
    LeyLine::new(Rising, 2, "BDGKO"),
    LeyLine::new(Rising, 3, "EHLP"),
    LeyLine::new(Rising, 4, "IMQ"),
    LeyLine::new(Rising, 5, "NR"),
    LeyLine::new(Falling, 1, "JO"),
    LeyLine::new(Falling, 2, "FKP"),
    LeyLine::new(Falling, 3, "CGLQ"),
    LeyLine::new(Falling, 4, "ADHMR"),
    LeyLine::new(Falling, 5, "BEIN"),
    LeyLine::new(Row, 1, "AB"),
    LeyLine::new(Row, 2, "CDE"),
    LeyLine::new(Row, 3, "FGHI"),
    LeyLine::new(Row, 4, "JKLMN"),
    LeyLine::new(Row, 5, "OPQR"),
];

const SIZE_5_LINES: [LeyLine; 18] = [
    LeyLine::new(Rising, 1, "ACFJO"),
    LeyLine::new(Rising, 2, "BDGKPU"),
    LeyLine::new(Rising, 3, "EHLQV"),
    LeyLine::new(Rising, 4, "IMRW"),
    LeyLine::new(Rising, 5, "NSX"),
    LeyLine::new(Rising, 6, "TY"),
    LeyLine::new(Falling, 1, "OU"),
    LeyLine::new(Falling, 2, "JPV"),
    LeyLine::new(Falling, 3, "FKQW"),
    LeyLine::new(Falling, 4, "CGLRX"),
    LeyLine::new(Falling, 5, "ADHMSY"),
    LeyLine::new(Falling, 6, "BEINT"),
    LeyLine::new(Row, 1, "AB"),
    LeyLine::new(Row, 2, "CDE"),
    LeyLine::new(Row, 3, "FGHI"),
    LeyLine::new(Row, 4, "JKLMN"),
    LeyLine::new(Row, 5, "OPQRST"),
    LeyLine::new(Row, 6, "UVWXY"),
];

/// Topology of every supported size, indexed by `size - 1`
pub static TOPOLOGIES: [Topology; 5] = [
    Topology::new(1, 3, &SIZE_1_LINES),
    Topology::new(2, 7, &SIZE_2_LINES),
    Topology::new(3, 12, &SIZE_3_LINES),
    Topology::new(4, 18, &SIZE_4_LINES),
    Topology::new(5, 25, &SIZE_5_LINES),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_validation() {
        assert!(BoardSize::new(0).is_err());
        assert!(BoardSize::new(6).is_err());
        for side in 1..=5 {
            assert_eq!(BoardSize::new(side).unwrap().get(), side);
        }
    }

    #[test]
    fn test_counts_per_size() {
        let expected_cells = [3, 7, 12, 18, 25];
        for (size, cells) in BoardSize::all().zip(expected_cells) {
            let topo = size.topology();
            assert_eq!(topo.size(), size.get());
            assert_eq!(topo.cell_count(), cells);
            assert_eq!(topo.line_count(), 3 * size.get() as usize + 3);
            assert!(topo.cell_count() <= MAX_CELLS);
            assert!(topo.line_count() <= MAX_LINES);
        }
    }

    #[test]
    fn test_member_totals() {
        let expected = [9, 21, 36, 54, 75];
        for (size, total) in BoardSize::all().zip(expected) {
            let sum: usize = size.topology().lines().iter().map(LeyLine::len).sum();
            assert_eq!(sum, total, "size {}", size);
        }
    }

    #[test]
    fn test_every_cell_on_three_lines() {
        for size in BoardSize::all() {
            let topo = size.topology();
            for cell in topo.cells() {
                let on = topo.lines().iter().filter(|l| l.contains(cell)).count();
                assert_eq!(on, 3, "cell {} on size {}", cell, size);
            }
            for line in topo.lines() {
                assert!(line.members().all(|m| topo.contains(m)), "{} off board", line.id);
            }
        }
    }

    #[test]
    fn test_one_line_per_axis_per_cell() {
        for size in BoardSize::all() {
            let topo = size.topology();
            for cell in topo.cells() {
                for axis in [Rising, Falling, Row] {
                    let on = topo
                        .lines()
                        .iter()
                        .filter(|l| l.id.axis == axis && l.contains(cell))
                        .count();
                    assert_eq!(on, 1, "cell {} axis {:?} size {}", cell, axis, size);
                }
            }
        }
    }

    #[test]
    fn test_thresholds() {
        let topo = BoardSize::new(5).unwrap().topology();
        let five = topo.line_index(LeyLineId::new(Falling, 5)).unwrap();
        assert_eq!(topo.lines()[five].len(), 6);
        assert_eq!(topo.lines()[five].threshold(), 3);
        for size in BoardSize::all() {
            for line in size.topology().lines() {
                assert_eq!(line.threshold(), (line.len() + 1) / 2);
            }
        }
    }

    #[test]
    fn test_lines_to_win() {
        let needs: Vec<usize> = BoardSize::all().map(|s| s.topology().lines_to_win()).collect();
        assert_eq!(needs, vec![3, 5, 6, 8, 9]);
    }

    #[test]
    fn test_cell_parsing() {
        assert_eq!(" b ".parse::<Cell>().unwrap(), Cell::new(1));
        assert_eq!("Y".parse::<Cell>().unwrap().letter(), 'Y');
        assert!(matches!("1".parse::<Cell>(), Err(GameError::InvalidMoveToken(_))));
        assert!(matches!("".parse::<Cell>(), Err(GameError::InvalidMoveToken(_))));
        assert!(matches!("AB".parse::<Cell>(), Err(GameError::InvalidMoveToken(_))));
        assert!(matches!("é".parse::<Cell>(), Err(GameError::InvalidMoveToken(_))));
    }

    #[test]
    fn test_line_id_display() {
        assert_eq!(LeyLineId::new(Rising, 2).to_string(), "/2");
        assert_eq!(LeyLineId::new(Falling, 1).to_string(), "\\1");
        assert_eq!(LeyLineId::new(Row, 3).to_string(), "-3");
    }
}
