use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::AnalysisError;
use crate::evaluation::{EvalValue, PlyEvals};
use crate::material::MaterialCount;
use crate::resolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("white"),
            Side::Black => f.write_str("black"),
        }
    }
}

/// Annotation glyph attached to a half-move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Annotation {
    Good,        // !
    Brilliant,   // !!
    Interesting, // !?
    Dubious,     // ?!
    Mistake,     // ?
    Blunder,     // ??
    /// Any other run of `!`/`?`, kept verbatim.
    Other(String),
}

impl Annotation {
    pub fn from_glyph(glyph: &str) -> Self {
        match glyph {
            "!" => Annotation::Good,
            "!!" => Annotation::Brilliant,
            "!?" => Annotation::Interesting,
            "?!" => Annotation::Dubious,
            "?" => Annotation::Mistake,
            "??" => Annotation::Blunder,
            other => Annotation::Other(other.to_string()),
        }
    }

    pub fn glyph(&self) -> &str {
        match self {
            Annotation::Good => "!",
            Annotation::Brilliant => "!!",
            Annotation::Interesting => "!?",
            Annotation::Dubious => "?!",
            Annotation::Mistake => "?",
            Annotation::Blunder => "??",
            Annotation::Other(glyph) => glyph,
        }
    }

    /// Glyphs the blunder classifier reports: `?`, `??` and `?!`.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Annotation::Dubious | Annotation::Mistake | Annotation::Blunder
        )
    }
}

impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glyph())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PieceKind {
    #[serde(rename = "P")]
    Pawn,
    #[serde(rename = "N")]
    Knight,
    #[serde(rename = "B")]
    Bishop,
    #[serde(rename = "R")]
    Rook,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl PieceKind {
    /// Maps a SAN piece letter. Pawns have no letter.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMove {
    pub piece: PieceKind,
    /// Destination square such as `e4`, or `O-O` / `O-O-O` for castling.
    pub square_or_tag: String,
}

/// One side's move as read from the move text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfMove {
    /// SAN with check, mate and annotation decoration removed. Capture
    /// markers and the promotion letter (`e8Q`) are kept.
    pub move_text: String,
    /// Evaluation substring, empty when the half-move carries none.
    pub raw_eval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl HalfMove {
    pub fn is_capture(&self) -> bool {
        self.move_text.contains('x')
    }

    pub fn is_error(&self) -> bool {
        self.annotation.as_ref().is_some_and(Annotation::is_error)
    }

    pub fn promotion(&self) -> Option<PieceKind> {
        resolver::strip_promotion(&self.move_text).1
    }

    pub fn resolve(&self) -> Result<ResolvedMove, AnalysisError> {
        let (token, _) = resolver::strip_promotion(&self.move_text);
        resolver::resolve_move(token)
    }
}

/// Tokenizer output for one move number. Black is absent only on a game's
/// final ply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPly {
    /// 1-based, equal to the move number.
    pub move_index: u32,
    pub white: HalfMove,
    pub black: Option<HalfMove>,
}

impl ParsedPly {
    pub fn half_move(&self, side: Side) -> Option<&HalfMove> {
        match side {
            Side::White => Some(&self.white),
            Side::Black => self.black.as_ref(),
        }
    }
}

/// A parsed ply with its normalized evaluations and material counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPly {
    #[serde(flatten)]
    pub parsed: ParsedPly,
    pub evals: PlyEvals,
    pub remaining_pieces: MaterialCount,
}

impl EnrichedPly {
    pub fn move_index(&self) -> u32 {
        self.parsed.move_index
    }

    pub fn eval(&self, side: Side) -> Option<EvalValue> {
        match side {
            Side::White => self.evals.white,
            Side::Black => self.evals.black,
        }
    }

    /// Pieces left for `side` when it moves on this ply.
    pub fn remaining_pieces(&self, side: Side) -> Option<u8> {
        match side {
            Side::White => Some(self.remaining_pieces.white),
            Side::Black => self.remaining_pieces.black,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlunderEvent {
    pub move_index: u32,
    pub side: Side,
    pub move_text: String,
    pub annotation: Annotation,
    /// Evaluation swing attributed to the move.
    pub eval_delta: EvalValue,
}
