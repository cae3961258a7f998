//! Five-in-a-row on an N×N board.
//!
//! Win detection walks every maximal line of the four direction families
//! exactly once, tracking the current mark and its run length. A run flags its
//! owner as soon as it reaches `win_length`, so overlines also win.

pub mod symmetry;

use rand::{Rng, RngCore};

use crate::engine::models::*;
use crate::engine::rules::BoardEngine;

use self::symmetry::ALL_SYMMETRIES;

pub const DEFAULT_SIZE: usize = 8;
pub const WIN_LENGTH: usize = 5;

/// Gomoku rules with precomputed scan lines.
#[derive(Debug, Clone)]
pub struct Gomoku {
    size: usize,
    win_length: usize,
    lines: Vec<Vec<Action>>,
}

impl Gomoku {
    pub fn new(size: usize) -> Self {
        Self::with_win_length(size, WIN_LENGTH)
    }

    pub fn with_win_length(size: usize, win_length: usize) -> Self {
        assert!(size > 0 && win_length > 0, "board size and win length must be positive");
        Self {
            size,
            win_length,
            lines: scan_lines(size),
        }
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Mark owning the first winning run in scan order, if any.
    pub fn winner(&self, board: &Board) -> Option<Player> {
        self.lines
            .iter()
            .find_map(|line| self.scan_line(board, line))
    }

    fn scan_line(&self, board: &Board, line: &[Action]) -> Option<Player> {
        let mut run_mark = Cell::Empty;
        let mut run_len = 0;
        for &action in line {
            let cell = board.at(action);
            if cell == Cell::Empty {
                run_mark = Cell::Empty;
                run_len = 0;
                continue;
            }
            if cell == run_mark {
                run_len += 1;
            } else {
                run_mark = cell;
                run_len = 1;
            }
            if run_len == self.win_length {
                return cell.owner();
            }
        }
        None
    }
}

impl Default for Gomoku {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

/// Every maximal line of the board, one entry per line:
/// rows, columns, main diagonals, anti-diagonals.
fn scan_lines(n: usize) -> Vec<Vec<Action>> {
    let walk = |mut row: usize, mut col: usize, d_row: isize, d_col: isize| {
        let mut line = Vec::with_capacity(n);
        loop {
            line.push(row * n + col);
            let next_row = row as isize + d_row;
            let next_col = col as isize + d_col;
            if next_row < 0 || next_col < 0 || next_row >= n as isize || next_col >= n as isize {
                return line;
            }
            row = next_row as usize;
            col = next_col as usize;
        }
    };

    let mut lines = Vec::with_capacity(6 * n);
    for row in 0..n {
        lines.push(walk(row, 0, 0, 1));
    }
    for col in 0..n {
        lines.push(walk(0, col, 1, 0));
    }
    // Main diagonals start on the left column or, past the corner, the top row.
    for row in 0..n {
        lines.push(walk(row, 0, 1, 1));
    }
    for col in 1..n {
        lines.push(walk(0, col, 1, 1));
    }
    // Anti-diagonals start on the top row or, past the corner, the right column.
    for col in 0..n {
        lines.push(walk(0, col, 1, -1));
    }
    for row in 1..n {
        lines.push(walk(row, n - 1, 1, -1));
    }
    lines
}

impl BoardEngine for Gomoku {
    fn size(&self) -> usize {
        self.size
    }

    fn initial_state(&self, random_plies: usize, rng: &mut dyn RngCore) -> Board {
        let mut board = Board::empty(self.size);
        let mut empty: Vec<Action> = (0..self.action_size()).collect();
        // Always leave at least one empty cell for the agents.
        let plies = (2 * random_plies).min(empty.len().saturating_sub(1));

        let mut player = Player::Plus;
        for _ in 0..plies {
            let pick = rng.gen_range(0..empty.len());
            let action = empty.swap_remove(pick);
            (board, player) = self.apply_move(&board, player, action);
        }
        board
    }

    fn apply_move(&self, board: &Board, player: Player, action: Action) -> (Board, Player) {
        assert!(
            action < self.action_size(),
            "action {} out of range for {}x{} board",
            action,
            self.size,
            self.size
        );
        assert_eq!(
            board.at(action),
            Cell::Empty,
            "action {} targets an occupied cell",
            action
        );
        (board.with_cell(action, player.mark()), -player)
    }

    fn legal_moves(&self, board: &Board) -> Vec<bool> {
        board.cells().iter().map(|c| *c == Cell::Empty).collect()
    }

    fn terminal_value(&self, board: &Board, player: Player) -> Outcome {
        if let Some(winner) = self.winner(board) {
            return if winner == player {
                Outcome::Win
            } else {
                Outcome::Loss
            };
        }
        let opponent_can_move = self.legal_moves(board).into_iter().any(|legal| legal);
        if opponent_can_move {
            Outcome::Ongoing
        } else {
            Outcome::Draw
        }
    }

    fn symmetries(&self, board: &Board, policy: &[f32]) -> Vec<(Board, Vec<f32>)> {
        let n = self.size;
        assert_eq!(policy.len(), n * n, "policy must cover every cell");
        ALL_SYMMETRIES
            .iter()
            .map(|sym| {
                let cells = sym.apply(n, board.cells());
                (Board::from_cells(n, cells), sym.apply(n, policy))
            })
            .collect()
    }

    fn render(&self, board: &Board, highlight: Option<Action>, with_coordinates: bool) -> String {
        let n = board.size();
        let mut out = String::new();
        if with_coordinates {
            out.push_str("   ");
            for col in 0..n {
                out.push_str(&format!("{:^3}", col));
            }
            out.push('\n');
        }
        for row in 0..n {
            if with_coordinates {
                out.push_str(&format!("{:>2} ", row));
            }
            for col in 0..n {
                let action = board.to_action(row, col);
                let symbol = board.at(action).symbol();
                if highlight == Some(action) {
                    out.push_str(&format!("[{}]", symbol));
                } else {
                    out.push_str(&format!(" {} ", symbol));
                }
            }
            out.push('\n');
        }
        out
    }
}
