//! Error taxonomy for matches, arenas and the tournament store.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::models::Action;

pub type Result<T> = std::result::Result<T, ArenaError>;

#[derive(Debug, Error)]
pub enum ArenaError {
    /// An agent proposed an action that is not legal in the canonical view it was shown.
    #[error("agent played invalid action {action}; legal mask: {}", render_mask(.legal))]
    InvalidMove { action: Action, legal: Vec<bool> },

    #[error("tournament store {} is corrupt: {source}", .path.display())]
    StoreCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not lock tournament store {}", .path.display())]
    StoreLocked { path: PathBuf },

    /// A pooled worker failed; `completed` matches were folded before the abort.
    #[error("evaluation aborted after {completed}/{requested} matches: {source}")]
    EvaluationAborted {
        completed: usize,
        requested: usize,
        #[source]
        source: Box<ArenaError>,
    },

    #[error("worker index {index} is out of range for {workers} workers")]
    InvalidPartition { index: usize, workers: usize },

    #[error("agent failure: {0}")]
    Agent(String),

    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

fn render_mask(legal: &[bool]) -> String {
    legal.iter().map(|l| if *l { '1' } else { '0' }).collect()
}
