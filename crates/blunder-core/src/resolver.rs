//! Moving piece and destination square from a cleaned SAN token.

use crate::error::AnalysisError;
use crate::game_data::{PieceKind, ResolvedMove};

const LONG_CASTLE: &str = "O-O-O";
const SHORT_CASTLE: &str = "O-O";

/// Split a trailing promotion letter off a cleaned move (`e8Q` -> `e8`).
/// The castling `O` is never a promotion.
pub fn strip_promotion(token: &str) -> (&str, Option<PieceKind>) {
    match token.chars().last() {
        Some(c) if c.is_ascii_uppercase() && c != 'O' => {
            (&token[..token.len() - 1], PieceKind::from_letter(c))
        }
        _ => (token, None),
    }
}

/// Resolve a move token that already had its promotion suffix stripped.
pub fn resolve_move(token: &str) -> Result<ResolvedMove, AnalysisError> {
    // The short tag is a substring of the long one.
    for tag in [LONG_CASTLE, SHORT_CASTLE] {
        if token.contains(tag) {
            return Ok(ResolvedMove {
                piece: PieceKind::King,
                square_or_tag: tag.to_string(),
            });
        }
    }

    if token.len() < 2 || !token.is_ascii() {
        return Err(AnalysisError::UnresolvedMove(token.to_string()));
    }

    let first = token.chars().next().unwrap_or_default();
    let piece = if first.is_ascii_uppercase() {
        PieceKind::from_letter(first)
            .ok_or_else(|| AnalysisError::UnresolvedMove(token.to_string()))?
    } else {
        PieceKind::Pawn
    };

    Ok(ResolvedMove {
        piece,
        square_or_tag: token[token.len() - 2..].to_string(),
    })
}
