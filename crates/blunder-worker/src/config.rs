//! Worker configuration from environment variables

use std::env;
use std::str::FromStr;

use blunder_core::EvalValue;

use crate::error::WorkerError;

/// Bounds on a blunder's evaluation swing. Events outside are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwingRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SwingRange {
    pub fn contains(&self, delta: EvalValue) -> bool {
        let value = delta.value();
        let above_min = self.min.map_or(true, |min| value >= min);
        let below_max = self.max.map_or(true, |max| value <= max);
        above_min && below_max
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    /// Threads used to analyze games
    pub workers: usize,

    /// Skip move texts without engine evaluations
    pub require_eval: bool,

    /// Filter applied to blunder events
    pub swing_range: SwingRange,

    /// Emit per-move and per-blunder records instead of full plies
    pub records: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, WorkerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (the process environment in
    /// production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkerError> {
        let workers = parse_var(&lookup, "BLUNDER_WORKERS")?.unwrap_or_else(num_cpus::get);
        if workers == 0 {
            return Err(WorkerError::Config("BLUNDER_WORKERS must be at least 1".into()));
        }

        let require_eval = parse_flag(&lookup, "BLUNDER_REQUIRE_EVAL")?;
        let records = parse_flag(&lookup, "BLUNDER_RECORDS")?;

        let swing_range = SwingRange {
            min: parse_var(&lookup, "BLUNDER_MIN_SWING")?,
            max: parse_var(&lookup, "BLUNDER_MAX_SWING")?,
        };
        check_range(&swing_range)?;

        Ok(Self {
            workers,
            require_eval,
            swing_range,
            records,
        })
    }
}

pub fn check_range(range: &SwingRange) -> Result<(), WorkerError> {
    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(WorkerError::Config(format!(
                "swing range is empty: min {min} > max {max}"
            )));
        }
    }
    Ok(())
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, WorkerError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| WorkerError::Config(format!("{key} has invalid value {value:?}"))),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool, WorkerError> {
    let Some(value) = lookup(key) else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" => Ok(false),
        "1" | "true" | "yes" => Ok(true),
        _ => Err(WorkerError::Config(format!(
            "{key} has invalid value {value:?}"
        ))),
    }
}
