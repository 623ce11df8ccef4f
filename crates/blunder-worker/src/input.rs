//! Move-text collection from input files.
//!
//! A line whose first token is `1.` holds one game's move text. Everything
//! else (PGN tag pairs, blank separators) is ignored, so both plain move-text
//! files and raw PGN exports can be fed in.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::WorkerError;

#[derive(Debug, Clone, PartialEq)]
pub struct GameInput {
    /// File the game was read from.
    pub source: String,
    /// 1-based line number within `source`.
    pub line: usize,
    pub movetext: String,
}

impl GameInput {
    /// Whether the move text carries engine evaluations.
    pub fn has_eval(&self) -> bool {
        self.movetext.contains("eval") || self.movetext.split_whitespace().any(is_decimal)
    }
}

/// `0.25`, `-1.5`, `+3.0`; move numbers like `12.` do not count.
fn is_decimal(token: &str) -> bool {
    let unsigned = token.trim_start_matches(['+', '-']);
    match unsigned.split_once('.') {
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Expand file paths and glob patterns, in the order given.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, WorkerError> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let before = paths.len();
        paths.extend(glob::glob(pattern)?.filter_map(|p| p.ok()));
        if paths.len() == before {
            warn!(pattern = %pattern, "Pattern matched no files");
        }
    }

    if paths.is_empty() {
        return Err(WorkerError::NoInput(patterns.to_vec()));
    }
    Ok(paths)
}

pub fn read_games(path: &Path) -> Result<Vec<GameInput>, WorkerError> {
    let contents = fs::read_to_string(path)?;
    let games = extract_games(&path.display().to_string(), &contents);
    info!(path = %path.display(), games = games.len(), "Read input file");
    Ok(games)
}

pub fn collect_games(patterns: &[String]) -> Result<Vec<GameInput>, WorkerError> {
    let mut games = Vec::new();
    for path in expand_patterns(patterns)? {
        games.extend(read_games(&path)?);
    }
    Ok(games)
}

pub fn extract_games(source: &str, contents: &str) -> Vec<GameInput> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| is_movetext_line(line))
        .map(|(i, line)| GameInput {
            source: source.to_string(),
            line: i + 1,
            movetext: line.trim().to_string(),
        })
        .collect()
}

fn is_movetext_line(line: &str) -> bool {
    line.split_whitespace().next() == Some("1.")
}
