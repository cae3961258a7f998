//! BoardEngine trait — the rules interface the match runner and arena drive.
//!
//! Matches, arenas and playoffs only talk to the rules through this trait, so
//! tests can plug in a scripted engine. `games::gomoku::Gomoku` is the real one.

use rand::RngCore;

use crate::engine::models::*;

/// Deterministic rules of a two-player N×N placement game.
pub trait BoardEngine: Send + Sync {
    /// Side length N of the board.
    fn size(&self) -> usize;

    /// Number of distinct actions, N².
    fn action_size(&self) -> usize {
        self.size() * self.size()
    }

    /// Empty board, optionally diversified by `random_plies` random moves per side.
    fn initial_state(&self, random_plies: usize, rng: &mut dyn RngCore) -> Board;

    /// Place `player`'s mark at `action`; returns the new board and the next mover.
    ///
    /// Panics if the cell is out of range or occupied.
    fn apply_move(&self, board: &Board, player: Player, action: Action) -> (Board, Player);

    /// Bit-vector over all actions, `true` for empty cells.
    fn legal_moves(&self, board: &Board) -> Vec<bool>;

    /// Game state from `player`'s point of view.
    fn terminal_value(&self, board: &Board, player: Player) -> Outcome;

    /// Board as seen by `player`: unchanged for `Plus`, marks swapped for `Minus`.
    fn canonical_view(&self, board: &Board, player: Player) -> Board {
        match player {
            Player::Plus => board.clone(),
            Player::Minus => -board,
        }
    }

    /// The 8 dihedral images of `(board, policy)`, transformed jointly.
    fn symmetries(&self, board: &Board, policy: &[f32]) -> Vec<(Board, Vec<f32>)>;

    /// Human-readable board for logs and transcripts.
    fn render(&self, board: &Board, highlight: Option<Action>, with_coordinates: bool) -> String;
}
