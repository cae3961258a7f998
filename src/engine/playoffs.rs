//! Resumable round-robin playoffs between checkpoints.
//!
//! Several worker processes cooperate on one catalogue: each owns a contiguous
//! slice of opponents and plays every checkpoint against it. Progress lives only
//! in the [`TournamentStore`], so a worker can be killed and restarted at any
//! time and will top each pair up to the target without replaying finished work.

use std::ops::Range;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::engine::agent::AgentLoader;
use crate::engine::arena::{ArenaScheduler, ArenaSettings};
use crate::engine::error::{ArenaError, Result};
use crate::engine::models::CheckpointRef;
use crate::engine::rules::BoardEngine;
use crate::engine::store::TournamentStore;

/// Slice of `0..len` owned by worker `index` of `workers`.
///
/// Boundaries are `round(len * i / workers)` with halves rounded up, so the
/// slices are contiguous, cover `0..len` and differ in length by at most one.
pub fn partition(len: usize, workers: usize, index: usize) -> Result<Range<usize>> {
    if workers == 0 || index >= workers {
        return Err(ArenaError::InvalidPartition { index, workers });
    }
    let boundary = |i: usize| (2 * len * i + workers) / (2 * workers);
    Ok(boundary(index)..boundary(index + 1))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffSettings {
    /// Matches each ordered pair should reach.
    pub target: u32,
    pub include_self_pairs: bool,
    pub arena: ArenaSettings,
}

impl Default for PlayoffSettings {
    fn default() -> Self {
        Self {
            target: 100,
            include_self_pairs: true,
            arena: ArenaSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayoffSummary {
    pub pairs_visited: usize,
    pub pairs_played: usize,
    pub games_played: usize,
}

pub struct PlayoffScheduler<'a> {
    engine: &'a dyn BoardEngine,
    loader: &'a dyn AgentLoader,
    store: &'a TournamentStore,
    settings: PlayoffSettings,
}

impl<'a> PlayoffScheduler<'a> {
    pub fn new(
        engine: &'a dyn BoardEngine,
        loader: &'a dyn AgentLoader,
        store: &'a TournamentStore,
        settings: PlayoffSettings,
    ) -> Self {
        Self {
            engine,
            loader,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &PlayoffSettings {
        &self.settings
    }

    /// Play worker `index`'s share of the catalogue: every checkpoint as
    /// reference (newest first) against each opponent in the worker's slice.
    pub fn run(&self, catalogue: &[CheckpointRef], workers: usize, index: usize) -> Result<PlayoffSummary> {
        let slice = partition(catalogue.len(), workers, index)?;
        let opponents = &catalogue[slice.clone()];
        tracing::info!(
            worker = index,
            workers,
            checkpoints = catalogue.len(),
            opponents = ?slice,
            target = self.settings.target,
            "starting playoffs"
        );

        let t0 = Instant::now();
        let mut summary = PlayoffSummary::default();
        for reference in catalogue.iter().rev() {
            for opponent in opponents {
                if reference == opponent && !self.settings.include_self_pairs {
                    continue;
                }
                summary.pairs_visited += 1;
                let games = self.play_pair(reference, opponent)?;
                if games > 0 {
                    summary.pairs_played += 1;
                    summary.games_played += games;
                }
            }
        }

        tracing::info!(
            worker = index,
            pairs_visited = summary.pairs_visited,
            pairs_played = summary.pairs_played,
            games_played = summary.games_played,
            elapsed_s = t0.elapsed().as_secs(),
            "playoffs finished"
        );
        Ok(summary)
    }

    /// Top one pair up to the target. Returns the number of matches played.
    pub fn play_pair(&self, reference: &CheckpointRef, opponent: &CheckpointRef) -> Result<usize> {
        let played = self.store.played(reference, opponent)?;
        let target = self.settings.target;
        if played >= target {
            tracing::debug!(reference = %reference, opponent = %opponent, played, "pair already complete");
            return Ok(0);
        }
        let to_play = (target - played) as usize;
        tracing::info!(
            reference = %reference,
            opponent = %opponent,
            played,
            to_play,
            "starting pair"
        );

        let source_ref = self.loader.source(reference)?;
        let source_opp = self.loader.source(opponent)?;
        let mut arena_settings = self.settings.arena.clone();
        // Continue game numbering where earlier batches for this pair stopped,
        // so seeds and transcript names are never reused.
        arena_settings.first_index = played as usize;
        arena_settings.transcript_dir = arena_settings
            .transcript_dir
            .map(|dir| dir.join(pair_dir_name(reference, opponent)));

        let mut arena = ArenaScheduler::new(self.engine, &source_ref, &source_opp, arena_settings)?;
        let totals = arena.evaluate(to_play)?;
        let record = self.store.merge_and_save(reference, opponent, &totals, target)?;

        tracing::info!(
            reference = %reference,
            opponent = %opponent,
            wins_ref = record.wins_ref,
            wins_opp = record.wins_opp,
            draws = record.draws,
            "pair stats"
        );
        Ok(totals.total())
    }
}

fn pair_dir_name(reference: &CheckpointRef, opponent: &CheckpointRef) -> PathBuf {
    PathBuf::from(format!(
        "r{}i{}_vs_r{}i{}",
        reference.run, reference.iteration, opponent.run, opponent.iteration
    ))
}
