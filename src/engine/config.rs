//! Arena and playoff configuration, loaded from TOML.
//!
//! Every field has a default, so an empty or missing file is a valid config.
//! Command-line flags are applied on top by the binaries.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::agent::BaselineKind;
use crate::engine::arena::ArenaSettings;
use crate::engine::error::{ArenaError, Result};
use crate::engine::playoffs::PlayoffSettings;
use crate::engine::store::LockPolicy;
use crate::games::gomoku::{DEFAULT_SIZE, WIN_LENGTH};

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    pub board: BoardConfig,
    pub arena: ArenaSettings,
    pub playoffs: PlayoffConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub size: usize,
    pub win_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            win_length: WIN_LENGTH,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayoffConfig {
    pub base_path: PathBuf,
    pub network_type: String,
    pub run_type: String,
    pub target: u32,
    pub include_self_pairs: bool,
    pub lock_timeout_secs: u64,
    pub lock_backoff_ms: u64,
    pub lock_max_backoff_ms: u64,
    pub lock_stale_after_secs: u64,
}

impl Default for PlayoffConfig {
    fn default() -> Self {
        let lock = LockPolicy::default();
        Self {
            base_path: PathBuf::from("."),
            network_type: "OriginalNetwork".into(),
            run_type: "default".into(),
            target: 100,
            include_self_pairs: true,
            lock_timeout_secs: lock.timeout.as_secs(),
            lock_backoff_ms: lock.backoff.as_millis() as u64,
            lock_max_backoff_ms: lock.max_backoff.as_millis() as u64,
            lock_stale_after_secs: lock.stale_after.as_secs(),
        }
    }
}

impl PlayoffConfig {
    pub fn lock_policy(&self) -> LockPolicy {
        LockPolicy {
            timeout: Duration::from_secs(self.lock_timeout_secs),
            backoff: Duration::from_millis(self.lock_backoff_ms),
            max_backoff: Duration::from_millis(self.lock_max_backoff_ms),
            stale_after: Duration::from_secs(self.lock_stale_after_secs),
        }
    }
}

/// Which built-in agent backs every checkpoint.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub baseline: BaselineKind,
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            baseline: BaselineKind::Random,
            seed: 0,
        }
    }
}

impl ArenaConfig {
    pub fn playoff_settings(&self) -> PlayoffSettings {
        PlayoffSettings {
            target: self.playoffs.target,
            include_self_pairs: self.playoffs.include_self_pairs,
            arena: self.arena.clone(),
        }
    }
}

/// Load a config from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<ArenaConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ArenaError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ArenaError::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Try well-known paths, returning the defaults if none is found.
pub fn load_default_config() -> ArenaConfig {
    let candidates = ["playoffs.toml", "../playoffs.toml"];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), "loaded config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load config");
                }
            }
        }
    }
    tracing::info!("no playoffs.toml found, using built-in defaults");
    ArenaConfig::default()
}

/// Explicit path if given (errors are fatal), otherwise the well-known candidates.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ArenaConfig> {
    match explicit {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(load_default_config()),
    }
}
