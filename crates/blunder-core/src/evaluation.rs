//! Evaluation normalization.
//!
//! Raw evaluations are either decimal pawn scores (`0.25`, `-1.4`, `+3.0`) or
//! mate scores (`#3`, `-#2`). Mate scores are reported from the mover's point
//! of view and are normalized here to a single polarity, collapsing to
//! positive or negative infinity.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::AnalysisError;
use crate::game_data::{ParsedPly, Side};

/// A normalized evaluation: a finite score or a mate sentinel (±∞).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EvalValue(f64);

impl EvalValue {
    pub const ZERO: EvalValue = EvalValue(0.0);
    pub const MATE_FOR: EvalValue = EvalValue(f64::INFINITY);
    pub const MATE_AGAINST: EvalValue = EvalValue(f64::NEG_INFINITY);

    pub fn score(value: f64) -> Self {
        EvalValue(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_mate(self) -> bool {
        self.0.is_infinite()
    }

    /// `self - rhs`, or `None` when both sides are the same mate sentinel.
    pub fn checked_sub(self, rhs: EvalValue) -> Option<EvalValue> {
        let diff = self.0 - rhs.0;
        if diff.is_nan() {
            None
        } else {
            Some(EvalValue(diff))
        }
    }
}

impl fmt::Display for EvalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == f64::INFINITY {
            f.write_str("+mate")
        } else if self.0 == f64::NEG_INFINITY {
            f.write_str("-mate")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// JSON has no infinity, so mate sentinels go out as strings.
impl Serialize for EvalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_mate() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// Normalized evaluations of one ply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlyEvals {
    pub white: Option<EvalValue>,
    pub black: Option<EvalValue>,
}

/// Normalize one raw evaluation string as seen by `side`.
///
/// Returns `Ok(None)` for an empty string.
pub fn normalize_eval(raw: &str, side: Side) -> Result<Option<EvalValue>, AnalysisError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let mate = if raw.starts_with("-#") {
        Some(EvalValue::MATE_AGAINST)
    } else if raw.starts_with('#') {
        Some(EvalValue::MATE_FOR)
    } else {
        None
    };

    if let Some(mate) = mate {
        // Black's mate scores come in with the opposite sign.
        return Ok(Some(match side {
            Side::White => mate,
            Side::Black => EvalValue(-mate.0),
        }));
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(EvalValue(v))),
        _ => Err(AnalysisError::MalformedGame(format!(
            "unparseable evaluation {raw:?}"
        ))),
    }
}

/// Normalize both evaluations of a ply.
///
/// A Black half-move without an evaluation takes White's evaluation from the
/// same ply. White has no fallback: its evaluation stays `None` and only
/// becomes an error if a blunder delta needs it.
pub fn normalize_ply(ply: &ParsedPly) -> Result<PlyEvals, AnalysisError> {
    let white = normalize_eval(&ply.white.raw_eval, Side::White)?;
    let black = match &ply.black {
        Some(black) => normalize_eval(&black.raw_eval, Side::Black)?.or(white),
        None => None,
    };
    Ok(PlyEvals { white, black })
}
