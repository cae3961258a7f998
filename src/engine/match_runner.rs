//! Plays a single match between two agents.

use std::time::Instant;

use crate::engine::agent::Agent;
use crate::engine::error::{ArenaError, Result};
use crate::engine::models::*;
use crate::engine::rules::BoardEngine;
use crate::engine::transcript::Transcript;

/// Mark occupied by agent A. Plus (first to move) goes to B unless seats are swapped.
pub fn seat_of_a(swap_seats: bool) -> Player {
    if swap_seats {
        Player::Plus
    } else {
        Player::Minus
    }
}

/// Translate a mover-relative terminal outcome into A's frame.
fn winner_for_a(outcome: Outcome, mover: Player, seat_a: Player) -> MatchWinner {
    let for_a = if mover == seat_a { outcome } else { outcome.flip() };
    match for_a {
        Outcome::Win => MatchWinner::AWins,
        Outcome::Loss => MatchWinner::BWins,
        _ => MatchWinner::Draw,
    }
}

/// Play one episode from `opening` until the first terminal position.
///
/// Both agents receive `game_seed` through [`Agent::new_game`]. Every
/// `select_move` call is timed per side. Every proposed action is checked against the legal moves of the canonical
/// view the agent was shown; an illegal action aborts the match with
/// [`ArenaError::InvalidMove`]. The transcript, when given, is renamed with the
/// outcome marker once the match is over.
pub fn execute_match(
    engine: &dyn BoardEngine,
    agent_a: &mut dyn Agent,
    agent_b: &mut dyn Agent,
    swap_seats: bool,
    game_seed: u64,
    opening: Board,
    mut transcript: Option<Transcript>,
) -> Result<MatchResult> {
    let t0 = Instant::now();
    let seat_a = seat_of_a(swap_seats);
    agent_a.new_game(game_seed);
    agent_b.new_game(game_seed);

    if let Some(t) = transcript.as_mut() {
        t.header(&format!(
            "A plays {}, B plays {}\n{}",
            seat_a.color(),
            (-seat_a).color(),
            engine.render(&opening, None, true)
        ))?;
    }

    let mut board = opening;
    let mut mover = board.side_to_move();
    let mut plies = 0;
    let mut move_times_a = Vec::new();
    let mut move_times_b = Vec::new();

    let winner = loop {
        let outcome = engine.terminal_value(&board, mover);
        if outcome.is_terminal() {
            break winner_for_a(outcome, mover, seat_a);
        }

        let canonical = engine.canonical_view(&board, mover);
        let is_a = mover == seat_a;
        let agent: &mut dyn Agent = if is_a { &mut *agent_a } else { &mut *agent_b };
        let started = Instant::now();
        let action = agent.select_move(&canonical)?;
        let elapsed = started.elapsed();
        if is_a {
            move_times_a.push(elapsed);
        } else {
            move_times_b.push(elapsed);
        }

        let legal = engine.legal_moves(&canonical);
        if !legal.get(action).copied().unwrap_or(false) {
            tracing::error!(
                action,
                agent = if is_a { "A" } else { "B" },
                ply = plies + 1,
                "agent proposed an invalid action"
            );
            return Err(ArenaError::InvalidMove { action, legal });
        }

        let (next_board, next_mover) = engine.apply_move(&board, mover, action);
        plies += 1;
        if let Some(t) = transcript.as_mut() {
            t.record_ply(
                plies,
                if is_a { "A" } else { "B" },
                mover.color(),
                next_board.to_row_col(action),
                &engine.render(&next_board, Some(action), true),
            )?;
        }
        board = next_board;
        mover = next_mover;
    };

    let transcript = match transcript {
        Some(t) => Some(t.finish(winner, plies)?),
        None => None,
    };
    tracing::debug!(?winner, plies, swap_seats, "match finished");

    Ok(MatchResult {
        winner,
        plies,
        transcript,
        move_times_a,
        move_times_b,
        duration: t0.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::agent::LowestIndexAgent;
    use crate::games::gomoku::Gomoku;
    use rand::RngCore;

    /// Always proposes the same action.
    struct FixedAgent(Action);

    impl Agent for FixedAgent {
        fn select_move(&mut self, _canonical: &Board) -> Result<Action> {
            Ok(self.0)
        }
    }

    /// Rules where whoever places the first mark wins on the spot.
    struct FirstMarkWins(Gomoku);

    impl BoardEngine for FirstMarkWins {
        fn size(&self) -> usize {
            self.0.size()
        }
        fn initial_state(&self, random_plies: usize, rng: &mut dyn RngCore) -> Board {
            self.0.initial_state(random_plies, rng)
        }
        fn apply_move(&self, board: &Board, player: Player, action: Action) -> (Board, Player) {
            self.0.apply_move(board, player, action)
        }
        fn legal_moves(&self, board: &Board) -> Vec<bool> {
            self.0.legal_moves(board)
        }
        fn terminal_value(&self, board: &Board, player: Player) -> Outcome {
            match board.cells().iter().find_map(|c| c.owner()) {
                Some(owner) if owner == player => Outcome::Win,
                Some(_) => Outcome::Loss,
                None => Outcome::Ongoing,
            }
        }
        fn symmetries(&self, board: &Board, policy: &[f32]) -> Vec<(Board, Vec<f32>)> {
            self.0.symmetries(board, policy)
        }
        fn render(&self, board: &Board, highlight: Option<Action>, coords: bool) -> String {
            self.0.render(board, highlight, coords)
        }
    }

    #[test]
    fn test_first_mover_seat_follows_swap_flag() {
        let engine = FirstMarkWins(Gomoku::new(3));
        let run = |swap| {
            execute_match(
                &engine,
                &mut LowestIndexAgent,
                &mut LowestIndexAgent,
                swap,
                0,
                Board::empty(3),
                None,
            )
            .unwrap()
        };
        let normal = run(false);
        assert_eq!(normal.winner, MatchWinner::BWins);
        assert_eq!(normal.plies, 1);
        assert_eq!(run(true).winner, MatchWinner::AWins);
    }

    #[test]
    fn test_lowest_index_agents_on_gomoku() {
        // Plus fills every even index, completing column 0 at index 32 on ply 33.
        let engine = Gomoku::new(8);
        let result = execute_match(
            &engine,
            &mut LowestIndexAgent,
            &mut LowestIndexAgent,
            false,
            0,
            Board::empty(8),
            None,
        )
        .unwrap();
        assert_eq!(result.winner, MatchWinner::BWins);
        assert_eq!(result.plies, 33);
        assert!(result.transcript.is_none());
        // B holds Plus and made the winning 17th move.
        assert_eq!(result.move_times_b.len(), 17);
        assert_eq!(result.move_times_a.len(), 16);
        let thinking: std::time::Duration =
            result.move_times_a.iter().chain(&result.move_times_b).sum();
        assert!(result.duration >= thinking);

        let swapped = execute_match(
            &engine,
            &mut LowestIndexAgent,
            &mut LowestIndexAgent,
            true,
            0,
            Board::empty(8),
            None,
        )
        .unwrap();
        assert_eq!(swapped.winner, MatchWinner::AWins);
    }

    /// Remembers the seed of its last game and plays like `LowestIndexAgent`.
    struct SeedRecorder(Option<u64>);

    impl Agent for SeedRecorder {
        fn select_move(&mut self, canonical: &Board) -> Result<Action> {
            LowestIndexAgent.select_move(canonical)
        }

        fn new_game(&mut self, game_seed: u64) {
            self.0 = Some(game_seed);
        }
    }

    #[test]
    fn test_agents_receive_the_game_seed() {
        let engine = Gomoku::new(3);
        let mut a = SeedRecorder(None);
        let mut b = SeedRecorder(None);
        execute_match(&engine, &mut a, &mut b, false, 77, Board::empty(3), None).unwrap();
        assert_eq!(a.0, Some(77));
        assert_eq!(b.0, Some(77));
    }

    #[test]
    fn test_invalid_action_is_fatal() {
        let engine = Gomoku::new(3);
        let opening = Board::from_rows(&["wb-", "---", "---"]);
        let err = execute_match(
            &engine,
            &mut FixedAgent(0),
            &mut FixedAgent(0),
            false,
            0,
            opening,
            None,
        )
        .unwrap_err();
        match err {
            ArenaError::InvalidMove { action, legal } => {
                assert_eq!(action, 0);
                assert_eq!(legal.len(), 9);
                assert!(!legal[0] && !legal[1] && legal[2]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_action_is_fatal() {
        let engine = Gomoku::new(3);
        let err = execute_match(
            &engine,
            &mut FixedAgent(99),
            &mut FixedAgent(99),
            true,
            0,
            Board::empty(3),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ArenaError::InvalidMove { action: 99, .. }));
    }

    #[test]
    fn test_full_board_draw_ends_immediately() {
        let engine = Gomoku::new(3);
        let full = Board::from_rows(&["wbw", "wbb", "bwb"]);
        let result = execute_match(
            &engine,
            &mut LowestIndexAgent,
            &mut LowestIndexAgent,
            false,
            0,
            full,
            None,
        )
        .unwrap();
        assert_eq!(result.winner, MatchWinner::Draw);
        assert_eq!(result.plies, 0);
    }

    #[test]
    fn test_transcript_is_finalized_with_winner() {
        let dir = tempfile::tempdir().unwrap();
        let engine = FirstMarkWins(Gomoku::new(3));
        let transcript = Transcript::create(dir.path(), "match_0000").unwrap();
        let result = execute_match(
            &engine,
            &mut LowestIndexAgent,
            &mut LowestIndexAgent,
            true,
            0,
            Board::empty(3),
            Some(transcript),
        )
        .unwrap();
        let path = result.transcript.expect("transcript path");
        assert_eq!(path, dir.path().join("match_0000_A.txt"));
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("A plays w, B plays b"));
        assert!(text.contains("ply 1 | A (w) -> (0, 0)"));
    }
}
