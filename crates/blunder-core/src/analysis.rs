//! Per-game pipeline: tokenize, normalize, count material, classify.

use serde::Serialize;
use tracing::debug;

use crate::blunder::classify;
use crate::error::AnalysisError;
use crate::evaluation::{normalize_ply, EvalValue};
use crate::game_data::{BlunderEvent, EnrichedPly, ParsedPly, PieceKind, Side};
use crate::material::track_material;
use crate::tokenizer::tokenize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAnalysis {
    pub plies: Vec<EnrichedPly>,
    pub blunders: Vec<BlunderEvent>,
}

/// One half-move, reduced to what per-piece move statistics need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub move_index: u32,
    pub side: Side,
    pub piece: PieceKind,
    pub square_or_tag: String,
    /// Piece a pawn promoted to on this move.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceKind>,
    pub remaining_pieces: u8,
}

/// One blunder event joined with its piece, square and material count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlunderRecord {
    pub move_index: u32,
    pub side: Side,
    pub piece: PieceKind,
    pub square_or_tag: String,
    pub eval_delta: EvalValue,
    pub remaining_pieces: u8,
}

/// Run the full pipeline on one game's move text.
pub fn analyze_game(movetext: &str) -> Result<GameAnalysis, AnalysisError> {
    let plies = enrich(tokenize(movetext)?)?;
    let blunders = classify(&plies)?;
    debug!(
        plies = plies.len(),
        blunders = blunders.len(),
        "Analyzed game"
    );
    Ok(GameAnalysis { plies, blunders })
}

/// Attach normalized evaluations and material counts to parsed plies.
pub fn enrich(plies: Vec<ParsedPly>) -> Result<Vec<EnrichedPly>, AnalysisError> {
    let counts = track_material(&plies);
    plies
        .into_iter()
        .zip(counts)
        .map(|(parsed, remaining_pieces)| {
            let evals = normalize_ply(&parsed)?;
            Ok(EnrichedPly {
                parsed,
                evals,
                remaining_pieces,
            })
        })
        .collect()
}

impl GameAnalysis {
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    /// Every half-move of the game, White before Black within a ply.
    /// A trailing White-only ply is included, unlike the blunder scan.
    pub fn move_records(&self) -> Result<Vec<MoveRecord>, AnalysisError> {
        let mut records = Vec::with_capacity(self.plies.len() * 2);
        for ply in &self.plies {
            for side in [Side::White, Side::Black] {
                let (Some(half), Some(remaining_pieces)) =
                    (ply.parsed.half_move(side), ply.remaining_pieces(side))
                else {
                    continue;
                };
                let resolved = half.resolve()?;
                records.push(MoveRecord {
                    move_index: ply.move_index(),
                    side,
                    piece: resolved.piece,
                    square_or_tag: resolved.square_or_tag,
                    promotion: half.promotion(),
                    remaining_pieces,
                });
            }
        }
        Ok(records)
    }

    pub fn blunder_records(&self) -> Result<Vec<BlunderRecord>, AnalysisError> {
        self.blunders
            .iter()
            .map(|event| {
                let ply = self
                    .plies
                    .get(event.move_index as usize - 1)
                    .ok_or_else(|| {
                        AnalysisError::MalformedGame(format!(
                            "blunder at move {} is past the last ply",
                            event.move_index
                        ))
                    })?;
                let half = ply
                    .parsed
                    .half_move(event.side)
                    .ok_or_else(|| AnalysisError::UnresolvedMove(event.move_text.clone()))?;
                let resolved = half.resolve()?;
                Ok(BlunderRecord {
                    move_index: event.move_index,
                    side: event.side,
                    piece: resolved.piece,
                    square_or_tag: resolved.square_or_tag,
                    eval_delta: event.eval_delta,
                    remaining_pieces: ply.remaining_pieces(event.side).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_data::Annotation;

    #[test]
    fn test_analyze_game_end_to_end() {
        let game = analyze_game("1. e4 1.5 2... e5 1.2?! 2. Nf3 1.0 Nc6").unwrap();
        assert_eq!(game.ply_count(), 2);

        let first = &game.plies[0];
        assert_eq!(first.parsed.white.move_text, "e4");
        assert_eq!(first.evals.white, Some(EvalValue::score(1.5)));
        assert_eq!(
            first.parsed.black.as_ref().unwrap().annotation,
            Some(Annotation::Dubious)
        );

        let second = &game.plies[1];
        assert_eq!(second.parsed.white.move_text, "Nf3");
        assert_eq!(second.parsed.black.as_ref().unwrap().move_text, "Nc6");
        assert_eq!(second.parsed.black.as_ref().unwrap().raw_eval, "");

        for ply in &game.plies {
            assert_eq!(ply.remaining_pieces(Side::White), Some(16));
            assert_eq!(ply.remaining_pieces(Side::Black), Some(16));
        }

        assert_eq!(game.blunders.len(), 1);
        assert_eq!(game.blunders[0].side, Side::Black);
        assert_eq!(game.blunders[0].eval_delta, EvalValue::score(1.2 - 1.5));
    }

    #[test]
    fn test_move_records() {
        let game = analyze_game("1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6 4. O-O Nxe4 5. exd8=Q").unwrap();
        let records = game.move_records().unwrap();
        assert_eq!(records.len(), 9);

        assert_eq!(records[6].piece, PieceKind::King);
        assert_eq!(records[6].square_or_tag, "O-O");
        assert_eq!(records[7].side, Side::Black);
        assert_eq!(records[7].square_or_tag, "e4");

        let last = records.last().unwrap();
        assert_eq!(last.piece, PieceKind::Pawn);
        assert_eq!(last.square_or_tag, "d8");
        assert_eq!(last.promotion, Some(PieceKind::Queen));
        assert_eq!(last.remaining_pieces, 15);
        assert_eq!(records[0].promotion, None);
    }

    #[test]
    fn test_comment_question_mark_is_not_an_error() {
        let game = analyze_game(
            "1. e4 { [%eval 0.2] Is this good? } 1... e5 { [%eval 0.3] } 2. Nf3 { [%eval 0.3] } 2... Nc6 { [%eval 0.3] }",
        )
        .unwrap();
        assert!(game.blunders.is_empty());

        let game = analyze_game("1. e4 { What? } 1... e5 2. Nf3 2... Nc6").unwrap();
        assert!(game.blunders.is_empty());
        assert_eq!(game.ply_count(), 2);
    }

    #[test]
    fn test_blunder_records() {
        let game =
            analyze_game("1. e4 0.3 1... e5 0.3 2. Qh5 0.1 2... Nc6 0.2 3. Bc4 0.2 3... Nf6?? #1 4. Qxf7# #0")
                .unwrap();
        let records = game.blunder_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].move_index, 3);
        assert_eq!(records[0].piece, PieceKind::Knight);
        assert_eq!(records[0].square_or_tag, "f6");
        assert_eq!(records[0].remaining_pieces, 16);
        assert_eq!(records[0].eval_delta, EvalValue::MATE_AGAINST);
    }

    #[test]
    fn test_serializes_to_json() {
        let game = analyze_game("1. e4 0.2 1... f6? 0.9 2. Qh5 #1 2... g5?? #1").unwrap();
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["plies"][0]["white"]["move_text"], "e4");
        assert_eq!(json["plies"][0]["remaining_pieces"]["white"], 16);
        assert_eq!(json["blunders"][1]["annotation"], "??");
        assert_eq!(json["blunders"][1]["eval_delta"], "-mate");
        assert_eq!(json["blunders"][1]["side"], "black");
    }
}
