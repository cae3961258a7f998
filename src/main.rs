use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gomoku_arena::engine::agent::BaselineLoader;
use gomoku_arena::engine::catalogue::{discover_checkpoints, store_path};
use gomoku_arena::engine::config::resolve_config;
use gomoku_arena::engine::playoffs::PlayoffScheduler;
use gomoku_arena::engine::store::TournamentStore;
use gomoku_arena::games::gomoku::Gomoku;

#[derive(Parser)]
#[command(name = "gomoku-arena", about = "Playoff worker: plays its share of checkpoint pairs")]
struct Cli {
    /// Path to playoffs.toml (default: auto-discover)
    #[arg(long, env = "GOMOKU_ARENA_CONFIG")]
    config: Option<PathBuf>,

    /// Number of cooperating worker processes
    #[arg(long, default_value = "1", env = "GOMOKU_ARENA_NUM_WORKERS")]
    num_workers: usize,

    /// Index of this worker, in 0..num_workers
    #[arg(long, default_value = "0", env = "GOMOKU_ARENA_WORKER_INDEX")]
    worker_index: usize,

    /// Root of the checkpoint tree
    #[arg(long)]
    base_path: Option<PathBuf>,

    #[arg(long)]
    network_type: Option<String>,

    #[arg(long)]
    run_type: Option<String>,

    /// Matches per ordered pair
    #[arg(long)]
    target: Option<u32>,

    /// Concurrent matches within one pair
    #[arg(long)]
    parallelism: Option<usize>,

    /// Directory for per-match transcripts
    #[arg(long)]
    transcripts: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut config = resolve_config(cli.config.as_deref())?;

    if let Some(v) = cli.base_path { config.playoffs.base_path = v; }
    if let Some(v) = cli.network_type { config.playoffs.network_type = v; }
    if let Some(v) = cli.run_type { config.playoffs.run_type = v; }
    if let Some(v) = cli.target { config.playoffs.target = v; }
    if let Some(v) = cli.parallelism { config.arena.parallelism = v; }
    if let Some(v) = cli.transcripts { config.arena.transcript_dir = Some(v); }

    let playoffs = &config.playoffs;
    let catalogue = discover_checkpoints(&playoffs.base_path, &playoffs.network_type, &playoffs.run_type)?;
    if catalogue.is_empty() {
        tracing::warn!(
            base_path = %playoffs.base_path.display(),
            network_type = %playoffs.network_type,
            run_type = %playoffs.run_type,
            "no checkpoints found"
        );
        return Ok(());
    }

    let store = TournamentStore::new(store_path(&playoffs.base_path, &playoffs.network_type, &playoffs.run_type))
        .with_lock_policy(playoffs.lock_policy());
    let engine = Gomoku::with_win_length(config.board.size, config.board.win_length);
    let loader = BaselineLoader::new(config.agent.baseline, config.agent.seed);
    tracing::info!(
        store = %store.path().display(),
        board = config.board.size,
        baseline = ?config.agent.baseline,
        "playoff worker ready"
    );

    let scheduler = PlayoffScheduler::new(&engine, &loader, &store, config.playoff_settings());
    let summary = scheduler.run(&catalogue, cli.num_workers, cli.worker_index)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
