//! Arena CLI — run one head-to-head evaluation from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 100 --a-type random --b-type lowest
//!   cargo run --release --bin arena -- --games 40 --parallelism 4 --transcripts games/

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gomoku_arena::engine::agent::{BaselineKind, BaselineLoader};
use gomoku_arena::engine::arena::{ArenaScheduler, ArenaTotals};
use gomoku_arena::engine::config::resolve_config;
use gomoku_arena::games::gomoku::Gomoku;

#[derive(Parser)]
#[command(name = "arena", about = "Run agent-vs-agent arena experiments for gomoku")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Path to playoffs.toml (default: auto-discover)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Opening seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Concurrent games
    #[arg(long)]
    parallelism: Option<usize>,

    /// Random opening moves per side
    #[arg(long)]
    random_plies: Option<usize>,

    /// Board side length
    #[arg(long)]
    size: Option<usize>,

    /// Directory for per-game transcripts
    #[arg(long)]
    transcripts: Option<PathBuf>,

    /// A display name
    #[arg(long, default_value = "a")]
    a_name: String,

    /// A agent: "lowest" or "random"
    #[arg(long, default_value = "random")]
    a_type: String,

    #[arg(long, default_value = "1")]
    a_seed: u64,

    /// B display name
    #[arg(long, default_value = "b")]
    b_name: String,

    /// B agent: "lowest" or "random"
    #[arg(long, default_value = "random")]
    b_type: String,

    #[arg(long, default_value = "2")]
    b_seed: u64,
}

fn parse_kind(label: &str, value: &str) -> Result<BaselineKind, String> {
    match value {
        "lowest" => Ok(BaselineKind::Lowest),
        "random" => Ok(BaselineKind::Random),
        other => Err(format!("unknown {} agent type '{}'", label, other)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    let mut settings = config.arena.clone();
    if let Some(v) = cli.seed { settings.seed = v; }
    if let Some(v) = cli.parallelism { settings.parallelism = v; }
    if let Some(v) = cli.random_plies { settings.random_plies = v; }
    if let Some(v) = cli.transcripts { settings.transcript_dir = Some(v); }
    let size = cli.size.unwrap_or(config.board.size);

    let source_a = BaselineLoader::new(parse_kind("A", &cli.a_type)?, cli.a_seed)
        .named_source(cli.a_name.as_str(), cli.a_seed);
    let source_b = BaselineLoader::new(parse_kind("B", &cli.b_type)?, cli.b_seed)
        .named_source(cli.b_name.as_str(), cli.b_seed);

    eprintln!(
        "Arena: {} games on {}x{}, seed={}, parallelism={}, random_plies={}",
        cli.games, size, size, settings.seed, settings.parallelism, settings.random_plies
    );
    eprintln!("  {}: type={}, seed={}", cli.a_name, cli.a_type, cli.a_seed);
    eprintln!("  {}: type={}, seed={}", cli.b_name, cli.b_type, cli.b_seed);
    eprintln!();

    let engine = Gomoku::with_win_length(size, config.board.win_length);
    let mut arena = ArenaScheduler::new(&engine, &source_a, &source_b, settings)?;

    let progress_cb = |totals: ArenaTotals, total: usize| {
        eprint!(
            "\r  [{}/{}] games completed ({}-{}-{})",
            totals.total(),
            total,
            totals.wins_a,
            totals.wins_b,
            totals.draws
        );
    };

    let totals = arena.evaluate_with_progress(cli.games, Some(&progress_cb))?;

    eprintln!("\r                                                  "); // clear progress line
    println!("{}", totals.summary(&cli.a_name, &cli.b_name, &arena.timing()));
    Ok(())
}
