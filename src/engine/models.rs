//! Core data types shared by the rule engine, arena and playoff scheduler.

use std::fmt;
use std::ops::Neg;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Flat cell index in `[0, N²)`; `(row, col) = (action / N, action % N)`.
pub type Action = usize;

/// Numeric value reported for a drawn game by [`Outcome::value`].
pub const DRAW_VALUE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Plus,
    Minus,
}

impl Cell {
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Plus => Some(Player::Plus),
            Cell::Minus => Some(Player::Minus),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Plus => 'w',
            Cell::Minus => 'b',
        }
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        match self {
            Cell::Empty => Cell::Empty,
            Cell::Plus => Cell::Minus,
            Cell::Minus => Cell::Plus,
        }
    }
}

/// One of the two marks. `Plus` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Plus,
    Minus,
}

impl Player {
    pub fn sign(self) -> i8 {
        match self {
            Player::Plus => 1,
            Player::Minus => -1,
        }
    }

    pub fn mark(self) -> Cell {
        match self {
            Player::Plus => Cell::Plus,
            Player::Minus => Cell::Minus,
        }
    }

    /// Seat colour used in transcripts.
    pub fn color(self) -> char {
        self.mark().symbol()
    }
}

impl Neg for Player {
    type Output = Player;

    fn neg(self) -> Player {
        match self {
            Player::Plus => Player::Minus,
            Player::Minus => Player::Plus,
        }
    }
}

/// Immutable N×N grid. Every mutation returns a new board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn empty(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Build a board from row-major cells. Panics if `cells.len()` is not a square.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), size * size, "expected {} cells", size * size);
        Self { size, cells }
    }

    /// Parse rows written with `w`, `b` and `-`. Intended for tests and fixtures.
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            assert_eq!(row.chars().count(), size, "row {:?} is not {} wide", row, size);
            for ch in row.chars() {
                cells.push(match ch {
                    'w' => Cell::Plus,
                    'b' => Cell::Minus,
                    '-' => Cell::Empty,
                    other => panic!("invalid board char: {}", other),
                });
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn at(&self, action: Action) -> Cell {
        self.cells[action]
    }

    pub fn to_row_col(&self, action: Action) -> (usize, usize) {
        (action / self.size, action % self.size)
    }

    pub fn to_action(&self, row: usize, col: usize) -> Action {
        row * self.size + col
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// Plus moves whenever both marks have been played equally often.
    pub fn side_to_move(&self) -> Player {
        let plus = self.cells.iter().filter(|c| **c == Cell::Plus).count();
        let minus = self.cells.iter().filter(|c| **c == Cell::Minus).count();
        if plus > minus {
            Player::Minus
        } else {
            Player::Plus
        }
    }

    /// Return a copy with `action` set to `mark`.
    pub fn with_cell(&self, action: Action, mark: Cell) -> Board {
        let mut cells = self.cells.clone();
        cells[action] = mark;
        Board {
            size: self.size,
            cells,
        }
    }
}

impl Neg for &Board {
    type Output = Board;

    fn neg(self) -> Board {
        Board {
            size: self.size,
            cells: self.cells.iter().map(|c| -*c).collect(),
        }
    }
}

impl Neg for Board {
    type Output = Board;

    fn neg(self) -> Board {
        -&self
    }
}

/// Terminal value of a position relative to the querying player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }

    /// Same outcome seen by the other player.
    pub fn flip(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            other => other,
        }
    }

    /// Numeric form: 0 ongoing, ±1 win/loss, [`DRAW_VALUE`] for a draw.
    pub fn value(self) -> f64 {
        match self {
            Outcome::Ongoing => 0.0,
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => DRAW_VALUE,
        }
    }
}

/// Match outcome relative to the nominal player A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchWinner {
    AWins,
    BWins,
    Draw,
}

impl MatchWinner {
    /// Marker embedded in finalized transcript names.
    pub fn marker(self) -> &'static str {
        match self {
            MatchWinner::AWins => "A",
            MatchWinner::BWins => "B",
            MatchWinner::Draw => "draw",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: MatchWinner,
    pub plies: usize,
    pub transcript: Option<PathBuf>,
    /// Wall time of each `select_move` call made by A, in play order.
    pub move_times_a: Vec<Duration>,
    pub move_times_b: Vec<Duration>,
    /// Wall time of the whole match, opening excluded.
    pub duration: Duration,
}

/// A frozen agent snapshot found by checkpoint discovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckpointRef {
    pub run: u32,
    pub iteration: u32,
    pub file: PathBuf,
}

impl CheckpointRef {
    pub fn new(run: u32, iteration: u32, file: impl Into<PathBuf>) -> Self {
        Self {
            run,
            iteration,
            file: file.into(),
        }
    }
}

impl fmt::Display for CheckpointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run{}/it{}", self.run, self.iteration)
    }
}

/// Accumulated results of `reference` against `opponent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairwiseRecord {
    pub wins_ref: u32,
    pub wins_opp: u32,
    pub draws: u32,
    pub target: u32,
}

impl PairwiseRecord {
    pub fn played(&self) -> u32 {
        self.wins_ref + self.wins_opp + self.draws
    }

    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.played())
    }
}
