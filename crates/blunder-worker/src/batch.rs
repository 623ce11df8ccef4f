//! Parallel fan-out over games.
//!
//! Games are independent, so each worker thread takes a contiguous slice and
//! analyzes it without any shared state. Outcomes come back in input order.

use std::thread;

use blunder_core::{analyze_game, AnalysisError, BlunderRecord, GameAnalysis, MoveRecord};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{SwingRange, WorkerConfig};
use crate::input::GameInput;

/// Per-move and per-blunder views of one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecords {
    pub moves: Vec<MoveRecord>,
    pub blunders: Vec<BlunderRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedGame {
    pub analysis: GameAnalysis,
    /// Present when the worker runs in records mode.
    pub records: Option<GameRecords>,
}

#[derive(Debug, Clone)]
pub struct GameOutcome {
    pub source: String,
    pub line: usize,
    pub result: Result<AnalyzedGame, AnalysisError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub games: usize,
    pub analysed: usize,
    pub failed: usize,
    pub skipped_no_eval: usize,
    pub blunders: usize,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<GameOutcome>,
    pub stats: BatchStats,
}

pub fn run_batch(games: &[GameInput], config: &WorkerConfig) -> BatchReport {
    let eligible: Vec<&GameInput> = games
        .iter()
        .filter(|game| !config.require_eval || game.has_eval())
        .collect();

    let workers = config.workers.max(1);
    let chunk_size = eligible.len().div_ceil(workers).max(1);
    debug!(games = eligible.len(), workers, chunk_size, "Starting batch");

    let outcomes: Vec<GameOutcome> = thread::scope(|s| {
        let handles: Vec<_> = eligible
            .chunks(chunk_size)
            .map(|chunk| {
                s.spawn(move || {
                    chunk
                        .iter()
                        .map(|game| analyze_one(game, config))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    let mut stats = BatchStats {
        games: games.len(),
        skipped_no_eval: games.len() - eligible.len(),
        ..BatchStats::default()
    };
    for outcome in &outcomes {
        match &outcome.result {
            Ok(game) => {
                stats.analysed += 1;
                stats.blunders += game.analysis.blunders.len();
            }
            Err(_) => stats.failed += 1,
        }
    }

    BatchReport { outcomes, stats }
}

/// Analyze one game. Failures are logged here and returned, never raised.
pub fn analyze_one(game: &GameInput, config: &WorkerConfig) -> GameOutcome {
    let result = analyze_filtered(&game.movetext, &config.swing_range).and_then(|analysis| {
        let records = if config.records {
            Some(GameRecords {
                moves: analysis.move_records()?,
                blunders: analysis.blunder_records()?,
            })
        } else {
            None
        };
        Ok(AnalyzedGame { analysis, records })
    });

    if let Err(e) = &result {
        warn!(source = %game.source, line = game.line, error = %e, "Skipping game");
    }

    GameOutcome {
        source: game.source.clone(),
        line: game.line,
        result,
    }
}

fn analyze_filtered(movetext: &str, swing: &SwingRange) -> Result<GameAnalysis, AnalysisError> {
    let mut analysis = analyze_game(movetext)?;
    if !swing.is_unbounded() {
        analysis.blunders.retain(|event| swing.contains(event.eval_delta));
    }
    Ok(analysis)
}
