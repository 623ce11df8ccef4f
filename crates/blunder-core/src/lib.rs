//! Gameplay parsing and blunder detection for annotated move text.
//!
//! A game's move-text blob goes through the tokenizer, the evaluation
//! normalizer, the material tracker and the blunder classifier. The main
//! entry point is `analyze_game()`, which runs all four and returns the
//! enriched plies together with the blunder events.

pub mod analysis;
pub mod blunder;
pub mod error;
pub mod evaluation;
pub mod game_data;
pub mod material;
pub mod resolver;
pub mod tokenizer;

pub use analysis::{analyze_game, BlunderRecord, GameAnalysis, MoveRecord};
pub use error::AnalysisError;
pub use evaluation::EvalValue;
pub use game_data::{
    Annotation, BlunderEvent, EnrichedPly, HalfMove, ParsedPly, PieceKind, ResolvedMove, Side,
};
