//! Persistent pairwise results shared by cooperating playoff workers.
//!
//! The store is one JSON blob rewritten as a whole. Writers go through
//! [`TournamentStore::merge_and_save`], which serialises reload-merge-save
//! behind a `<store>.lock` file so concurrent processes never lose each other's
//! increments. Readers load without locking; a save is a temp file plus rename,
//! so they always see a complete blob.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::engine::arena::ArenaTotals;
use crate::engine::error::{ArenaError, Result};
use crate::engine::models::{CheckpointRef, PairwiseRecord};

/// In-memory view of the store: reference → opponent → record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayoffTable {
    records: BTreeMap<CheckpointRef, BTreeMap<CheckpointRef, PairwiseRecord>>,
}

impl PlayoffTable {
    pub fn get(&self, reference: &CheckpointRef, opponent: &CheckpointRef) -> Option<&PairwiseRecord> {
        self.records.get(reference)?.get(opponent)
    }

    /// Record for the pair, created empty on first access.
    pub fn record_mut(&mut self, reference: &CheckpointRef, opponent: &CheckpointRef) -> &mut PairwiseRecord {
        self.records
            .entry(reference.clone())
            .or_default()
            .entry(opponent.clone())
            .or_default()
    }

    pub fn played(&self, reference: &CheckpointRef, opponent: &CheckpointRef) -> u32 {
        self.get(reference, opponent).map_or(0, PairwiseRecord::played)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&CheckpointRef, &CheckpointRef, &PairwiseRecord)> {
        self.records
            .iter()
            .flat_map(|(r, opps)| opps.iter().map(move |(o, rec)| (r, o, rec)))
    }

    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize, Deserialize)]
struct StoreFile {
    pairs: Vec<StoreEntry>,
}

#[derive(Serialize, Deserialize)]
struct StoreEntry {
    reference: CheckpointRef,
    opponent: CheckpointRef,
    record: PairwiseRecord,
}

/// Lock acquisition policy for [`TournamentStore::merge_and_save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockPolicy {
    /// Minimum time to wait before giving up. The effective budget is never
    /// shorter than `stale_after + max_backoff`, so an orphaned lock is always
    /// broken before a waiter gives up on it.
    pub timeout: Duration,
    /// First sleep between attempts; doubles up to `max_backoff`.
    pub backoff: Duration,
    pub max_backoff: Duration,
    /// A lock file older than this is assumed orphaned and removed.
    pub stale_after: Duration,
}

impl LockPolicy {
    pub fn wait_budget(&self) -> Duration {
        self.timeout.max(self.stale_after + self.max_backoff)
    }
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            backoff: Duration::from_millis(20),
            max_backoff: Duration::from_secs(2),
            stale_after: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TournamentStore {
    path: PathBuf,
    lock: LockPolicy,
}

/// Removes the lock file when dropped.
struct StoreLock {
    path: PathBuf,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to release store lock");
        }
    }
}

impl TournamentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: LockPolicy::default(),
        }
    }

    pub fn with_lock_policy(mut self, lock: LockPolicy) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Load the whole store. A missing file is an empty store; a file that
    /// does not parse is [`ArenaError::StoreCorruption`].
    pub fn load(&self) -> Result<PlayoffTable> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PlayoffTable::default()),
            Err(e) => return Err(e.into()),
        };
        let file: StoreFile =
            serde_json::from_str(&text).map_err(|source| ArenaError::StoreCorruption {
                path: self.path.clone(),
                source,
            })?;

        let mut table = PlayoffTable::default();
        for entry in file.pairs {
            *table.record_mut(&entry.reference, &entry.opponent) = entry.record;
        }
        Ok(table)
    }

    /// Replace the store with `table`. Readers see either the old or the new blob.
    pub fn save(&self, table: &PlayoffTable) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let file = StoreFile {
            pairs: table
                .pairs()
                .map(|(r, o, rec)| StoreEntry {
                    reference: r.clone(),
                    opponent: o.clone(),
                    record: *rec,
                })
                .collect(),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &file)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Matches already recorded for the pair, read from a fresh load.
    pub fn played(&self, reference: &CheckpointRef, opponent: &CheckpointRef) -> Result<u32> {
        Ok(self.load()?.played(reference, opponent))
    }

    /// Fold `delta` (A = reference, B = opponent) into the pair's record under
    /// the store lock and persist. Returns the merged record.
    pub fn merge_and_save(
        &self,
        reference: &CheckpointRef,
        opponent: &CheckpointRef,
        delta: &ArenaTotals,
        target: u32,
    ) -> Result<PairwiseRecord> {
        let _lock = self.acquire_lock()?;
        let mut table = self.load()?;
        let record = table.record_mut(reference, opponent);
        record.wins_ref += delta.wins_a as u32;
        record.wins_opp += delta.wins_b as u32;
        record.draws += delta.draws as u32;
        record.target = target;
        let merged = *record;
        self.save(&table)?;
        tracing::debug!(
            reference = %reference,
            opponent = %opponent,
            played = merged.played(),
            target,
            "merged pair results"
        );
        Ok(merged)
    }

    fn acquire_lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();
        if let Some(dir) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let started = Instant::now();
        let budget = self.lock.wait_budget();
        let mut backoff = self.lock.backoff;
        let mut attempt = 0u32;
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&lock_path) {
                Ok(mut file) => {
                    writeln!(file, "{}", std::process::id())?;
                    return Ok(StoreLock { path: lock_path });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.lock_is_stale(&lock_path) {
                        self.break_stale_lock(&lock_path)?;
                        continue;
                    }
                    let waited = started.elapsed();
                    if waited >= budget {
                        tracing::warn!(
                            path = %lock_path.display(),
                            waited_ms = waited.as_millis() as u64,
                            attempt,
                            "gave up waiting for store lock"
                        );
                        return Err(ArenaError::StoreLocked {
                            path: self.path.clone(),
                        });
                    }
                    tracing::debug!(attempt, path = %lock_path.display(), "store locked, backing off");
                    thread::sleep(backoff.min(budget - waited));
                    backoff = (backoff * 2).min(self.lock.max_backoff);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Move a lock judged stale out of the way, then re-check the moved file.
    /// If another waiter already replaced the stale lock with a live one, the
    /// live lock is linked back into place instead of being deleted.
    fn break_stale_lock(&self, lock_path: &Path) -> Result<()> {
        let dir = match lock_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let moved = tempfile::Builder::new()
            .prefix(".store-lock-stale")
            .tempfile_in(dir)?
            .into_temp_path();
        match fs::rename(lock_path, &moved) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }

        if self.lock_is_stale(&moved) {
            tracing::warn!(path = %lock_path.display(), "broke stale store lock");
        } else {
            tracing::debug!(path = %lock_path.display(), "lock was replaced before it was broken, restoring");
            match fs::hard_link(&moved, lock_path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::warn!(path = %lock_path.display(), "live store lock was lost while breaking a stale one");
                }
                Err(e) => return Err(e.into()),
            }
        }
        moved.close()?;
        Ok(())
    }

    fn lock_is_stale(&self, lock_path: &Path) -> bool {
        fs::metadata(lock_path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map_or(false, |age| age > self.lock.stale_after)
    }
}
