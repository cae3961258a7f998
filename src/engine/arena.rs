//! Agent-vs-agent arena: plays a batch of matches over a fixed worker pool.
//!
//! Workers share one [`MatchCounter`] and one [`ArenaTally`]. A worker reserves
//! a match immediately before playing it, which fixes the match's global
//! scheduling index. The index decides the seating (the first half of the batch
//! is played with swapped seats) and fixes the match seed, which drives the
//! random opening and is handed to both agents through `Agent::new_game`. With
//! agents that derive their randomness from that seed, results do not depend on
//! how matches happen to interleave across workers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::agent::{Agent, AgentSource};
use crate::engine::error::{ArenaError, Result};
use crate::engine::match_runner::execute_match;
use crate::engine::models::*;
use crate::engine::rules::BoardEngine;
use crate::engine::transcript::Transcript;

/// Knobs for one arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Worker threads, each owning its own pair of agents.
    pub parallelism: usize,
    /// Random opening moves per side before the agents take over.
    pub random_plies: usize,
    /// Match `i` of a batch is game number `first_index + i` and uses the
    /// seed `seed + first_index + i`.
    pub seed: u64,
    /// Game number of the batch's first match. Offsets seeds and transcript
    /// names when a batch continues earlier ones.
    pub first_index: usize,
    /// When set, every match writes a transcript into this directory.
    pub transcript_dir: Option<PathBuf>,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            parallelism: 2,
            random_plies: 2,
            seed: 42,
            first_index: 0,
            transcript_dir: None,
        }
    }
}

impl ArenaSettings {
    /// Game number of the batch's `index`-th reservation.
    pub fn game_number(&self, index: usize) -> usize {
        self.first_index + index
    }

    pub fn game_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(self.game_number(index) as u64)
    }
}

/// A reserved match slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    /// Global scheduling order, `0..total`.
    pub index: usize,
    pub swap_seats: bool,
}

/// Shared count of matches still to be started.
#[derive(Debug)]
pub struct MatchCounter {
    total: usize,
    remaining: AtomicUsize,
}

impl MatchCounter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            remaining: AtomicUsize::new(total),
        }
    }

    /// Claim the next match, or `None` once every match has been handed out.
    /// The first `ceil(total / 2)` reservations play with swapped seats.
    pub fn reserve(&self) -> Option<Reservation> {
        let before = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| r.checked_sub(1))
            .ok()?;
        let index = self.total - before;
        Some(Reservation {
            index,
            swap_seats: 2 * index < self.total,
        })
    }

    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }
}

/// Count, mean and population standard deviation of a series, in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
struct RunningStats {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl RunningStats {
    fn push(&mut self, sample: Duration) {
        let ms = sample.as_secs_f64() * 1000.0;
        self.count += 1;
        self.sum += ms;
        self.sum_sq += ms * ms;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    fn std(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_sq / self.count as f64 - mean * mean).max(0.0).sqrt()
    }
}

#[derive(Debug, Default)]
struct TimingAccumulator {
    moves_a: RunningStats,
    moves_b: RunningStats,
    games: RunningStats,
}

/// Move-selection and game timings of a batch, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub moves_a: usize,
    pub move_mean_ms_a: f64,
    pub move_std_ms_a: f64,
    pub moves_b: usize,
    pub move_mean_ms_b: f64,
    pub move_std_ms_b: f64,
    pub games: usize,
    pub avg_game_ms: f64,
    pub total_game_ms: f64,
}

impl TimingSummary {
    pub fn summary_lines(&self, name_a: &str, name_b: &str) -> Vec<String> {
        if self.games == 0 {
            return Vec::new();
        }
        vec![
            format!(
                "  {:>16}: {:.3}ms/move (std {:.3}ms, {} moves)",
                name_a, self.move_mean_ms_a, self.move_std_ms_a, self.moves_a
            ),
            format!(
                "  {:>16}: {:.3}ms/move (std {:.3}ms, {} moves)",
                name_b, self.move_mean_ms_b, self.move_std_ms_b, self.moves_b
            ),
            format!(
                "  Avg game: {:.0}ms  |  Total: {:.1}s",
                self.avg_game_ms,
                self.total_game_ms / 1000.0
            ),
        ]
    }
}

/// Running win/draw counts relative to agent A, plus timings.
///
/// Counts are atomics; timings sit behind a mutex touched once per match.
#[derive(Debug, Default)]
pub struct ArenaTally {
    wins_a: AtomicUsize,
    wins_b: AtomicUsize,
    draws: AtomicUsize,
    timing: Mutex<TimingAccumulator>,
}

impl ArenaTally {
    /// Fold one finished match. Timings are folded before the outcome, so a
    /// snapshot never shows a match whose timings are missing.
    pub fn record(&self, result: &MatchResult) {
        {
            let mut timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
            for t in &result.move_times_a {
                timing.moves_a.push(*t);
            }
            for t in &result.move_times_b {
                timing.moves_b.push(*t);
            }
            timing.games.push(result.duration);
        }
        let slot = match result.winner {
            MatchWinner::AWins => &self.wins_a,
            MatchWinner::BWins => &self.wins_b,
            MatchWinner::Draw => &self.draws,
        };
        slot.fetch_add(1, Ordering::AcqRel);
    }

    pub fn timing(&self) -> TimingSummary {
        let timing = self.timing.lock().unwrap_or_else(PoisonError::into_inner);
        TimingSummary {
            moves_a: timing.moves_a.count,
            move_mean_ms_a: timing.moves_a.mean(),
            move_std_ms_a: timing.moves_a.std(),
            moves_b: timing.moves_b.count,
            move_mean_ms_b: timing.moves_b.mean(),
            move_std_ms_b: timing.moves_b.std(),
            games: timing.games.count,
            avg_game_ms: timing.games.mean(),
            total_game_ms: timing.games.sum,
        }
    }

    pub fn snapshot(&self) -> ArenaTotals {
        ArenaTotals {
            wins_a: self.wins_a.load(Ordering::Acquire),
            wins_b: self.wins_b.load(Ordering::Acquire),
            draws: self.draws.load(Ordering::Acquire),
        }
    }

    fn reset(&self) {
        self.wins_a.store(0, Ordering::Release);
        self.wins_b.store(0, Ordering::Release);
        self.draws.store(0, Ordering::Release);
        *self.timing.lock().unwrap_or_else(PoisonError::into_inner) = TimingAccumulator::default();
    }
}

/// Final (or in-flight) counts of an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaTotals {
    pub wins_a: usize,
    pub wins_b: usize,
    pub draws: usize,
}

impl ArenaTotals {
    pub fn total(&self) -> usize {
        self.wins_a + self.wins_b + self.draws
    }

    /// A's score: 1 per win, 0.5 per draw, averaged. 0.5 for an empty batch.
    pub fn score_a(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.5;
        }
        (self.wins_a as f64 + 0.5 * self.draws as f64) / total as f64
    }

    pub fn win_rate_a(&self) -> f64 {
        self.wins_a as f64 / self.total().max(1) as f64
    }

    /// Wilson score interval for A's win rate.
    pub fn confidence_interval_95(&self) -> (f64, f64) {
        let n = self.total();
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate_a();
        let z = 1.96_f64;
        let n = n as f64;
        let denom = 1.0 + z * z / n;
        let center = (p + z * z / (2.0 * n)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n)) / n).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self, name_a: &str, name_b: &str, timing: &TimingSummary) -> String {
        let total = self.total().max(1) as f64;
        let (lo, hi) = self.confidence_interval_95();
        let mut lines = vec![format!("Arena Results ({} games)", self.total())];
        lines.push("=".repeat(60));
        lines.push(format!(
            "  {:>16}: {:4} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
            name_a,
            self.wins_a,
            self.wins_a as f64 * 100.0 / total,
            lo * 100.0,
            hi * 100.0,
        ));
        lines.push(format!(
            "  {:>16}: {:4} wins ({:5.1}%)",
            name_b,
            self.wins_b,
            self.wins_b as f64 * 100.0 / total,
        ));
        lines.push(format!(
            "  {:>16}: {:4}      ({:5.1}%)",
            "Draws",
            self.draws,
            self.draws as f64 * 100.0 / total,
        ));
        lines.push(format!("  Score for {}: {:.3}", name_a, self.score_a()));
        lines.extend(timing.summary_lines(name_a, name_b));
        lines.join("\n")
    }
}

/// The two agents owned by one worker.
struct WorkerAgents {
    a: Box<dyn Agent>,
    b: Box<dyn Agent>,
}

/// Progress hook: current totals and the batch size, called after every match.
pub type ProgressFn<'a> = &'a (dyn Fn(ArenaTotals, usize) + Sync);

/// Runs batches of matches between two agent sources over a fixed worker pool.
pub struct ArenaScheduler<'e> {
    engine: &'e dyn BoardEngine,
    name_a: String,
    name_b: String,
    settings: ArenaSettings,
    workers: Vec<WorkerAgents>,
    tally: Arc<ArenaTally>,
    pool: rayon::ThreadPool,
}

impl<'e> ArenaScheduler<'e> {
    /// Instantiate one agent per side for each of `settings.parallelism` workers.
    pub fn new(
        engine: &'e dyn BoardEngine,
        source_a: &AgentSource,
        source_b: &AgentSource,
        settings: ArenaSettings,
    ) -> Result<Self> {
        let parallelism = settings.parallelism.max(1);
        let workers = (0..parallelism)
            .map(|_| {
                Ok(WorkerAgents {
                    a: source_a.instantiate()?,
                    b: source_b.instantiate()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("arena-worker-{}", i))
            .build()?;

        Ok(Self {
            engine,
            name_a: source_a.name().to_string(),
            name_b: source_b.name().to_string(),
            settings,
            workers,
            tally: Arc::new(ArenaTally::default()),
            pool,
        })
    }

    pub fn parallelism(&self) -> usize {
        self.workers.len()
    }

    /// Shared tally handle; can be polled from another thread during `evaluate`.
    pub fn tally(&self) -> Arc<ArenaTally> {
        Arc::clone(&self.tally)
    }

    /// Timings of the current (or last) batch.
    pub fn timing(&self) -> TimingSummary {
        self.tally.timing()
    }

    pub fn evaluate(&mut self, count: usize) -> Result<ArenaTotals> {
        self.evaluate_with_progress(count, None)
    }

    /// Play exactly `count` matches and return the totals.
    ///
    /// The first worker error stops further reservations and the call returns
    /// [`ArenaError::EvaluationAborted`] carrying how many matches did finish.
    pub fn evaluate_with_progress(
        &mut self,
        count: usize,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<ArenaTotals> {
        self.tally.reset();
        let counter = MatchCounter::new(count);
        let abort = AtomicBool::new(false);
        let failure: Mutex<Option<ArenaError>> = Mutex::new(None);
        let t0 = Instant::now();

        tracing::info!(
            a = %self.name_a,
            b = %self.name_b,
            count,
            workers = self.workers.len(),
            "starting arena"
        );

        let Self {
            engine,
            settings,
            workers,
            tally,
            pool,
            ..
        } = self;
        let engine: &dyn BoardEngine = *engine;
        let settings: &ArenaSettings = settings;
        let tally: &ArenaTally = tally;

        pool.scope(|scope| {
            for (worker, agents) in workers.iter_mut().enumerate() {
                let counter = &counter;
                let abort = &abort;
                let failure = &failure;
                scope.spawn(move |_| {
                    while !abort.load(Ordering::Acquire) {
                        let Some(reservation) = counter.reserve() else {
                            break;
                        };
                        match play_reserved(engine, settings, agents, reservation) {
                            Ok(result) => {
                                tally.record(&result);
                                if let Some(report) = progress {
                                    report(tally.snapshot(), count);
                                }
                            }
                            Err(err) => {
                                tracing::error!(
                                    worker,
                                    index = reservation.index,
                                    error = %err,
                                    "arena worker failed"
                                );
                                abort.store(true, Ordering::Release);
                                failure
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .get_or_insert(err);
                                break;
                            }
                        }
                    }
                });
            }
        });

        let totals = tally.snapshot();
        if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(ArenaError::EvaluationAborted {
                completed: totals.total(),
                requested: count,
                source: Box::new(err),
            });
        }
        debug_assert_eq!(totals.total(), count);

        let timing = tally.timing();
        tracing::info!(
            wins_a = totals.wins_a,
            wins_b = totals.wins_b,
            draws = totals.draws,
            move_mean_ms_a = timing.move_mean_ms_a,
            move_mean_ms_b = timing.move_mean_ms_b,
            avg_game_ms = timing.avg_game_ms,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "arena finished"
        );
        Ok(totals)
    }
}

fn play_reserved(
    engine: &dyn BoardEngine,
    settings: &ArenaSettings,
    agents: &mut WorkerAgents,
    reservation: Reservation,
) -> Result<MatchResult> {
    let game_seed = settings.game_seed(reservation.index);
    let mut rng = StdRng::seed_from_u64(game_seed);
    let opening = engine.initial_state(settings.random_plies, &mut rng);
    let transcript = match &settings.transcript_dir {
        Some(dir) => Some(Transcript::create(
            dir,
            &format!("match_{:04}", settings.game_number(reservation.index)),
        )?),
        None => None,
    };
    execute_match(
        engine,
        agents.a.as_mut(),
        agents.b.as_mut(),
        reservation.swap_seats,
        game_seed,
        opening,
        transcript,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::agent::{LowestIndexAgent, RandomAgent};
    use crate::games::gomoku::Gomoku;
    use std::collections::HashSet;

    fn lowest(name: &str) -> AgentSource {
        AgentSource::new(name, || Ok(Box::new(LowestIndexAgent) as Box<dyn Agent>))
    }

    fn settings(parallelism: usize) -> ArenaSettings {
        ArenaSettings {
            parallelism,
            random_plies: 2,
            seed: 42,
            first_index: 0,
            transcript_dir: None,
        }
    }

    fn random(name: &str, seed: u64) -> AgentSource {
        AgentSource::new(name, move || Ok(Box::new(RandomAgent::new(seed)) as Box<dyn Agent>))
    }

    /// Plays legally for `fail_after` moves, then proposes an occupied cell.
    struct BrokenAgent {
        moves: usize,
        fail_after: usize,
    }

    impl Agent for BrokenAgent {
        fn select_move(&mut self, canonical: &Board) -> Result<Action> {
            self.moves += 1;
            if self.moves > self.fail_after {
                let occupied = canonical.cells().iter().position(|c| *c != Cell::Empty);
                return Ok(occupied.unwrap_or(canonical.cells().len()));
            }
            LowestIndexAgent.select_move(canonical)
        }
    }

    #[test]
    fn test_counter_hands_out_each_index_once() {
        let counter = MatchCounter::new(7);
        let mut seen = Vec::new();
        while let Some(r) = counter.reserve() {
            seen.push(r);
        }
        assert_eq!(seen.iter().map(|r| r.index).collect::<Vec<_>>(), (0..7).collect::<Vec<_>>());
        let swapped: Vec<usize> = seen.iter().filter(|r| r.swap_seats).map(|r| r.index).collect();
        assert_eq!(swapped, vec![0, 1, 2, 3]);
        assert_eq!(counter.remaining(), 0);
        assert!(counter.reserve().is_none());
    }

    #[test]
    fn test_counter_under_contention() {
        let counter = MatchCounter::new(1000);
        let indices: Mutex<Vec<usize>> = Mutex::new(Vec::new());
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    while let Some(r) = counter.reserve() {
                        indices.lock().unwrap().push(r.index);
                    }
                });
            }
        });
        let indices = indices.into_inner().unwrap();
        assert_eq!(indices.len(), 1000);
        assert_eq!(indices.iter().collect::<HashSet<_>>().len(), 1000);
    }

    #[test]
    fn test_evaluate_accounts_for_every_match() {
        let engine = Gomoku::new(8);
        let mut arena =
            ArenaScheduler::new(&engine, &random("random_a", 1), &random("random_b", 2), settings(3))
                .unwrap();
        for count in [0, 1, 5, 12] {
            let totals = arena.evaluate(count).unwrap();
            assert_eq!(totals.total(), count);
        }
    }

    #[test]
    fn test_seat_balance_with_lowest_index_agents() {
        // Without a random opening the first mover always wins, so the tally
        // exposes the seating split exactly.
        let engine = Gomoku::new(8);
        let mut s = settings(4);
        s.random_plies = 0;
        let mut arena = ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), s).unwrap();
        let totals = arena.evaluate(9).unwrap();
        assert_eq!(totals, ArenaTotals { wins_a: 5, wins_b: 4, draws: 0 });
    }

    #[test]
    fn test_evaluate_is_reproducible_across_runs() {
        let engine = Gomoku::new(8);
        let run = || {
            let mut arena =
                ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), settings(4)).unwrap();
            arena.evaluate(10).unwrap()
        };
        let first = run();
        assert_eq!(first.total(), 10);
        for _ in 0..3 {
            assert_eq!(run(), first);
        }
    }

    #[test]
    fn test_random_agents_are_reproducible_under_parallelism() {
        let engine = Gomoku::new(8);
        let run = |parallelism| {
            let mut arena = ArenaScheduler::new(
                &engine,
                &random("a", 3),
                &random("b", 4),
                settings(parallelism),
            )
            .unwrap();
            arena.evaluate(40).unwrap()
        };
        let serial = run(1);
        for _ in 0..5 {
            assert_eq!(run(4), serial);
        }
    }

    #[test]
    fn test_game_numbers_continue_from_first_index() {
        let mut s = settings(1);
        assert_eq!(s.game_seed(2), 44);
        s.first_index = 6;
        assert_eq!(s.game_number(0), 6);
        assert_eq!(s.game_seed(2), 50);
    }

    #[test]
    fn test_timings_cover_every_move_and_game() {
        let engine = Gomoku::new(8);
        let mut s = settings(2);
        s.random_plies = 0;
        let mut arena = ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), s).unwrap();
        let totals = arena.evaluate(4).unwrap();
        let timing = arena.timing();
        // Every game is the 33-ply lowest-index race.
        assert_eq!(timing.games, 4);
        assert_eq!(timing.moves_a + timing.moves_b, 4 * 33);
        assert!(timing.move_std_ms_a >= 0.0 && timing.avg_game_ms >= timing.move_mean_ms_a);
        assert!(timing.total_game_ms >= timing.avg_game_ms);

        let text = totals.summary("a", "b", &timing);
        assert!(text.contains("ms/move"), "{}", text);
        assert!(text.contains("Avg game:"), "{}", text);

        arena.evaluate(0).unwrap();
        assert_eq!(arena.timing(), TimingSummary::default());
    }

    #[test]
    fn test_running_stats_mean_and_std() {
        let mut stats = RunningStats::default();
        for ms in [2, 4, 4, 4, 5, 5, 7, 9] {
            stats.push(Duration::from_millis(ms));
        }
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.std() - 2.0).abs() < 1e-9);
        assert_eq!(RunningStats::default().std(), 0.0);
    }

    #[test]
    fn test_progress_reports_every_match() {
        let engine = Gomoku::new(8);
        let calls = AtomicUsize::new(0);
        let report = |totals: ArenaTotals, count: usize| {
            assert!(totals.total() <= count);
            calls.fetch_add(1, Ordering::Relaxed);
        };
        let mut arena = ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), settings(2)).unwrap();
        let totals = arena.evaluate_with_progress(6, Some(&report)).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 6);
        assert_eq!(arena.tally().snapshot(), totals);
    }

    #[test]
    fn test_worker_failure_aborts_evaluation() {
        let engine = Gomoku::new(8);
        let broken = AgentSource::new("broken", || {
            Ok(Box::new(BrokenAgent { moves: 0, fail_after: 3 }) as Box<dyn Agent>)
        });
        let mut arena = ArenaScheduler::new(&engine, &broken, &lowest("b"), settings(2)).unwrap();
        match arena.evaluate(10) {
            Err(ArenaError::EvaluationAborted { completed, requested, source }) => {
                assert_eq!(requested, 10);
                assert!(completed < 10);
                assert!(matches!(*source, ArenaError::InvalidMove { .. }));
            }
            other => panic!("expected an aborted evaluation, got {:?}", other.map(|t| t.total())),
        }
    }

    #[test]
    fn test_agent_source_failure_surfaces_at_construction() {
        let engine = Gomoku::new(8);
        let missing = AgentSource::new("missing", || Err(ArenaError::Agent("no checkpoint".into())));
        assert!(matches!(
            ArenaScheduler::new(&engine, &missing, &lowest("b"), settings(2)),
            Err(ArenaError::Agent(_))
        ));
    }

    #[test]
    fn test_transcripts_written_per_match() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Gomoku::new(8);
        let mut s = settings(2);
        s.transcript_dir = Some(dir.path().to_path_buf());
        let mut arena = ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), s).unwrap();
        arena.evaluate(4).unwrap();
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|n| n.starts_with("match_000") && !n.ends_with("000.txt")));
    }

    #[test]
    fn test_transcript_names_continue_from_first_index() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Gomoku::new(8);
        for first_index in [0, 3] {
            let mut s = settings(2);
            s.first_index = first_index;
            s.transcript_dir = Some(dir.path().to_path_buf());
            let mut arena = ArenaScheduler::new(&engine, &lowest("a"), &lowest("b"), s).unwrap();
            arena.evaluate(3).unwrap();
        }
        let mut numbers: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy()[6..10].to_string())
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec!["0000", "0001", "0002", "0003", "0004", "0005"]);
    }

    #[test]
    fn test_wilson_interval_bounds() {
        let totals = ArenaTotals { wins_a: 10, wins_b: 0, draws: 0 };
        let (lo, hi) = totals.confidence_interval_95();
        assert!(lo > 0.6 && lo < 1.0);
        assert_eq!(hi, 1.0);
        assert_eq!(ArenaTotals::default().score_a(), 0.5);
        let text = totals.summary("a", "b", &TimingSummary::default());
        assert!(text.contains("Arena Results (10 games)"));
        assert!(!text.contains("Avg game"));
    }
}
