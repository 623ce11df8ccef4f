//! Blunder analysis worker
//!
//! Reads annotated move texts, runs the blunder analysis on every game in
//! parallel and writes JSON Lines.
//!
//! Usage: blunder-worker <input>... [--output FILE] [--workers N] [--require-eval]
//!        [--min-swing X] [--max-swing X] [--records]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use blunder_worker::batch::run_batch;
use blunder_worker::config::{check_range, WorkerConfig};
use blunder_worker::input::collect_games;
use blunder_worker::output::write_json_lines;

/// Flags override the matching BLUNDER_* environment variables.
#[derive(Parser, Debug)]
#[command(name = "blunder-worker", version, about)]
struct Args {
    /// Files or glob patterns holding one game's move text per line
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write JSON Lines here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Skip games without engine evaluations
    #[arg(long)]
    require_eval: bool,

    /// Drop blunders whose evaluation swing is below this value
    #[arg(long, allow_negative_numbers = true)]
    min_swing: Option<f64>,

    /// Drop blunders whose evaluation swing is above this value
    #[arg(long, allow_negative_numbers = true)]
    max_swing: Option<f64>,

    /// Emit per-move and per-blunder records instead of full plies
    #[arg(long)]
    records: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file for local runs
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = WorkerConfig::load()?;
    if let Some(workers) = args.workers {
        config.workers = workers.max(1);
    }
    config.require_eval |= args.require_eval;
    config.records |= args.records;
    if args.min_swing.is_some() {
        config.swing_range.min = args.min_swing;
    }
    if args.max_swing.is_some() {
        config.swing_range.max = args.max_swing;
    }
    check_range(&config.swing_range)?;

    info!(
        workers = config.workers,
        require_eval = config.require_eval,
        records = config.records,
        "Worker config loaded"
    );

    let games = collect_games(&args.inputs)?;
    info!(games = games.len(), "Collected move texts");

    let start = Instant::now();
    let report = run_batch(&games, &config);

    let written = match &args.output {
        Some(path) => write_json_lines(BufWriter::new(File::create(path)?), &report.outcomes)?,
        None => write_json_lines(BufWriter::new(io::stdout().lock()), &report.outcomes)?,
    };

    let stats = &report.stats;
    info!(
        games = stats.games,
        analysed = stats.analysed,
        failed = stats.failed,
        skipped_no_eval = stats.skipped_no_eval,
        blunders = stats.blunders,
        written,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch complete"
    );

    Ok(())
}
