//! Per-game analysis errors

use thiserror::Error;

use crate::game_data::Side;

/// Every variant is scoped to a single game. Callers skip the game, count the
/// failure and carry on with the rest of the corpus.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Malformed game: {0}")]
    MalformedGame(String),

    #[error("Unresolved move: {0:?}")]
    UnresolvedMove(String),

    #[error("Ambiguous evaluation at move {move_index} ({side}): mate minus mate")]
    AmbiguousEvaluation { move_index: u32, side: Side },

    #[error("Missing evaluation at move {move_index} ({side})")]
    MissingEvaluation { move_index: u32, side: Side },
}
