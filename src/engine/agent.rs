//! Agent trait, agent factories and the built-in baseline agents.
//!
//! Real agents (network + search) live outside this crate and plug in through
//! [`AgentLoader`]. The baselines here are enough to drive arenas and playoffs
//! end to end.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::engine::error::{ArenaError, Result};
use crate::engine::models::*;

/// Selects a move from the canonical board (the mover always plays `Plus`).
pub trait Agent: Send {
    fn select_move(&mut self, canonical: &Board) -> Result<Action>;

    /// Reset per-game state (search trees, caches). `game_seed` is fixed by the
    /// match's scheduling index, so stochastic agents can reseed from it.
    fn new_game(&mut self, _game_seed: u64) {}
}

type AgentFactory = dyn Fn() -> Result<Box<dyn Agent>> + Send + Sync;

/// Named factory for fresh, independent agent instances.
#[derive(Clone)]
pub struct AgentSource {
    name: String,
    factory: Arc<AgentFactory>,
}

impl AgentSource {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Agent>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self) -> Result<Box<dyn Agent>> {
        (self.factory)()
    }
}

impl fmt::Debug for AgentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSource").field("name", &self.name).finish()
    }
}

/// Turns a checkpoint into an agent source.
pub trait AgentLoader: Send + Sync {
    fn source(&self, checkpoint: &CheckpointRef) -> Result<AgentSource>;
}

/// Plays the lowest-index legal move. Fully deterministic.
#[derive(Debug, Clone, Default)]
pub struct LowestIndexAgent;

impl Agent for LowestIndexAgent {
    fn select_move(&mut self, canonical: &Board) -> Result<Action> {
        canonical
            .cells()
            .iter()
            .position(|c| *c == Cell::Empty)
            .ok_or_else(|| ArenaError::Agent("no legal move on a full board".into()))
    }
}

/// Picks a uniformly random legal move. The generator is reseeded from
/// `seed ^ game_seed` at every `new_game`, so a match's moves depend only on
/// the agent's seed and the match, not on which worker played it.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    seed: u64,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn new_game(&mut self, game_seed: u64) {
        self.rng = StdRng::seed_from_u64(self.seed ^ game_seed);
    }

    fn select_move(&mut self, canonical: &Board) -> Result<Action> {
        let empty: Vec<Action> = (0..canonical.cells().len())
            .filter(|a| canonical.at(*a) == Cell::Empty)
            .collect();
        empty
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| ArenaError::Agent("no legal move on a full board".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineKind {
    Lowest,
    Random,
}

/// Loader that backs every checkpoint with a baseline agent. Random agents are
/// seeded from `seed` and [`checkpoint_seed`] so each snapshot plays
/// differently but reproducibly.
#[derive(Debug, Clone)]
pub struct BaselineLoader {
    pub kind: BaselineKind,
    pub seed: u64,
}

impl BaselineLoader {
    pub fn new(kind: BaselineKind, seed: u64) -> Self {
        Self { kind, seed }
    }

    pub fn named_source(&self, name: impl Into<String>, seed: u64) -> AgentSource {
        match self.kind {
            BaselineKind::Lowest => {
                AgentSource::new(name, || Ok(Box::new(LowestIndexAgent) as Box<dyn Agent>))
            }
            BaselineKind::Random => AgentSource::new(name, move || {
                Ok(Box::new(RandomAgent::new(seed)) as Box<dyn Agent>)
            }),
        }
    }
}

impl AgentLoader for BaselineLoader {
    fn source(&self, checkpoint: &CheckpointRef) -> Result<AgentSource> {
        let seed = self.seed ^ checkpoint_seed(checkpoint);
        Ok(self.named_source(checkpoint.to_string(), seed))
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over `(run, iteration)` in little-endian bytes. Stable across
/// toolchains and platforms.
pub fn checkpoint_seed(checkpoint: &CheckpointRef) -> u64 {
    checkpoint
        .run
        .to_le_bytes()
        .iter()
        .chain(checkpoint.iteration.to_le_bytes().iter())
        .fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME))
}
