//! Checkpoint discovery on the training output tree.
//!
//! Layout: `<base>/<network_type>/<run_type>-<n>/checkpoint_<iteration>.<ext>`
//! with runs numbered from 1. The playoff store for a run type sits next to the
//! run directories as `<run_type>.playoffs.json`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::error::Result;
use crate::engine::models::CheckpointRef;

const CHECKPOINT_MARKER: &str = "checkpoint_";
const EXAMPLES_MARKER: &str = ".examples";

pub fn run_dir(base: &Path, network_type: &str, run_type: &str, run: u32) -> PathBuf {
    base.join(network_type).join(format!("{}-{}", run_type, run))
}

pub fn store_path(base: &Path, network_type: &str, run_type: &str) -> PathBuf {
    base.join(network_type).join(format!("{}.playoffs.json", run_type))
}

/// Iteration number of a checkpoint file name: the text after the last `_`
/// up to the first `.`. `None` for files that are not agent checkpoints.
pub fn parse_iteration(file_name: &str) -> Option<u32> {
    if !file_name.contains(CHECKPOINT_MARKER) || file_name.contains(EXAMPLES_MARKER) {
        return None;
    }
    let tail = &file_name[file_name.rfind('_')? + 1..];
    let digits = tail.split('.').next()?;
    digits.parse().ok()
}

/// All checkpoints of one (network type, run type), ordered by run then
/// iteration. Runs are probed from 1 until the first missing directory.
pub fn discover_checkpoints(base: &Path, network_type: &str, run_type: &str) -> Result<Vec<CheckpointRef>> {
    let mut catalogue = Vec::new();
    let mut run = 1;
    loop {
        let dir = run_dir(base, network_type, run_type, run);
        if !dir.is_dir() {
            break;
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match parse_iteration(name) {
                Some(iteration) => found.push(CheckpointRef::new(run, iteration, entry.path())),
                None => tracing::trace!(file = name, "skipping non-checkpoint file"),
            }
        }
        found.sort();
        tracing::debug!(run, dir = %dir.display(), checkpoints = found.len(), "scanned run");
        catalogue.extend(found);
        run += 1;
    }
    tracing::info!(
        network_type,
        run_type,
        runs = run - 1,
        checkpoints = catalogue.len(),
        "checkpoint catalogue built"
    );
    Ok(catalogue)
}
