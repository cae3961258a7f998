//! End-to-end arena runs over the real gomoku rules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

use gomoku_arena::engine::agent::{Agent, AgentSource, LowestIndexAgent, RandomAgent};
use gomoku_arena::engine::arena::{ArenaScheduler, ArenaSettings, ArenaTotals};
use gomoku_arena::engine::error::ArenaError;
use gomoku_arena::engine::models::*;
use gomoku_arena::games::gomoku::Gomoku;

fn random_source(name: &str, seed: u64) -> AgentSource {
    AgentSource::new(name, move || Ok(Box::new(RandomAgent::new(seed)) as Box<dyn Agent>))
}

fn lowest_source(name: &str) -> AgentSource {
    AgentSource::new(name, || Ok(Box::new(LowestIndexAgent) as Box<dyn Agent>))
}

/// Counts how many agents a source built.
fn counted_source(name: &str, built: &'static AtomicUsize) -> AgentSource {
    AgentSource::new(name, move || {
        built.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(LowestIndexAgent) as Box<dyn Agent>)
    })
}

#[test]
fn deterministic_agents_give_identical_totals_for_any_parallelism() {
    let engine = Gomoku::new(8);
    let run = |parallelism| {
        let settings = ArenaSettings {
            parallelism,
            random_plies: 3,
            seed: 1234,
            first_index: 0,
            transcript_dir: None,
        };
        let mut arena =
            ArenaScheduler::new(&engine, &lowest_source("a"), &lowest_source("b"), settings).unwrap();
        arena.evaluate(16).unwrap()
    };
    let serial = run(1);
    assert_eq!(serial.total(), 16);
    assert_eq!(run(4), serial);
    assert_eq!(run(8), serial);
}

#[test]
fn random_agents_fill_the_requested_count() {
    let engine = Gomoku::new(7);
    let settings = ArenaSettings {
        parallelism: 3,
        random_plies: 1,
        seed: 9,
        first_index: 0,
        transcript_dir: None,
    };
    let mut arena =
        ArenaScheduler::new(&engine, &random_source("x", 11), &random_source("y", 12), settings).unwrap();
    let totals = arena.evaluate(30).unwrap();
    assert_eq!(totals.wins_a + totals.wins_b + totals.draws, 30);
    assert!(totals.score_a() >= 0.0 && totals.score_a() <= 1.0);
}

#[test]
fn agents_are_built_once_per_worker() {
    static BUILT_A: AtomicUsize = AtomicUsize::new(0);
    static BUILT_B: AtomicUsize = AtomicUsize::new(0);
    let engine = Gomoku::new(6);
    let settings = ArenaSettings {
        parallelism: 3,
        ..ArenaSettings::default()
    };
    let mut arena = ArenaScheduler::new(
        &engine,
        &counted_source("a", &BUILT_A),
        &counted_source("b", &BUILT_B),
        settings,
    )
    .unwrap();
    arena.evaluate(12).unwrap();
    arena.evaluate(5).unwrap();
    assert_eq!(BUILT_A.load(Ordering::SeqCst), 3);
    assert_eq!(BUILT_B.load(Ordering::SeqCst), 3);
}

#[test]
fn tally_can_be_polled_from_another_thread() {
    let engine = Gomoku::new(8);
    let settings = ArenaSettings {
        parallelism: 1,
        ..ArenaSettings::default()
    };
    let mut arena =
        ArenaScheduler::new(&engine, &random_source("a", 1), &random_source("b", 2), settings).unwrap();
    let tally = arena.tally();
    // The worker parks after its fifth match until the poller has looked.
    let paused = Barrier::new(2);
    let resumed = Barrier::new(2);
    let pause_mid_batch = |totals: ArenaTotals, _count: usize| {
        if totals.total() == 5 {
            paused.wait();
            resumed.wait();
        }
    };
    let totals = std::thread::scope(|s| {
        let poller = s.spawn(|| {
            paused.wait();
            let seen = tally.snapshot();
            let timing = tally.timing();
            resumed.wait();
            (seen, timing)
        });
        let totals = arena.evaluate_with_progress(20, Some(&pause_mid_batch)).unwrap();
        let (seen, timing) = poller.join().unwrap();
        assert_eq!(seen.total(), 5);
        assert!(seen.total() > 0 && seen.total() < totals.total());
        assert_eq!(timing.games, 5);
        totals
    });
    assert_eq!(totals.total(), 20);
    assert_eq!(tally.snapshot(), totals);
}

/// Proposes the centre cell every move.
struct StubbornAgent;

impl Agent for StubbornAgent {
    fn select_move(&mut self, canonical: &Board) -> gomoku_arena::engine::error::Result<Action> {
        Ok(canonical.size() * canonical.size() / 2)
    }
}

#[test]
fn illegal_agent_aborts_the_whole_evaluation() {
    let engine = Gomoku::new(5);
    let stubborn = AgentSource::new("stubborn", || Ok(Box::new(StubbornAgent) as Box<dyn Agent>));
    let settings = ArenaSettings {
        parallelism: 2,
        random_plies: 0,
        seed: 0,
        first_index: 0,
        transcript_dir: None,
    };
    let mut arena = ArenaScheduler::new(&engine, &stubborn, &stubborn, settings).unwrap();
    let err = arena.evaluate(8).unwrap_err();
    match err {
        ArenaError::EvaluationAborted { completed, requested, source } => {
            assert_eq!(completed, 0);
            assert_eq!(requested, 8);
            assert!(matches!(*source, ArenaError::InvalidMove { action: 12, .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(arena.tally().snapshot(), ArenaTotals::default());
}
