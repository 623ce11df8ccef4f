//! Blunder classification.
//!
//! A half-move annotated `?`, `??` or `?!` becomes a [`BlunderEvent`]. The
//! evaluation swing is measured against the position the mover was handed:
//! for White, Black's evaluation on the previous ply (0 before move 1); for
//! Black, White's evaluation on the same ply.

use crate::error::AnalysisError;
use crate::evaluation::EvalValue;
use crate::game_data::{Annotation, BlunderEvent, EnrichedPly, HalfMove, Side};

/// State carried between plies.
#[derive(Debug, Clone, Default)]
struct Scan {
    prior_black_eval: Option<EvalValue>,
    events: Vec<BlunderEvent>,
}

/// Scan the plies in order and collect blunder events.
///
/// The scan stops at the first ply without a Black half-move, so an
/// annotated White move that ends the game is not reported.
pub fn classify(plies: &[EnrichedPly]) -> Result<Vec<BlunderEvent>, AnalysisError> {
    let initial = Scan {
        prior_black_eval: Some(EvalValue::ZERO),
        events: Vec::new(),
    };

    let scan = plies
        .iter()
        .map_while(|ply| ply.parsed.black.as_ref().map(|black| (ply, black)))
        .try_fold(initial, |scan, (ply, black)| step(scan, ply, black))?;

    Ok(scan.events)
}

fn step(mut scan: Scan, ply: &EnrichedPly, black: &HalfMove) -> Result<Scan, AnalysisError> {
    let move_index = ply.move_index();
    let white = &ply.parsed.white;
    let white_eval = ply.evals.white;
    let black_eval = ply.evals.black;

    if let Some(annotation) = error_annotation(white) {
        let delta = swing(scan.prior_black_eval, white_eval, move_index, Side::White)?;
        scan.events
            .push(event(move_index, Side::White, white, annotation, delta));
    }

    if let Some(annotation) = error_annotation(black) {
        let delta = swing(black_eval, white_eval, move_index, Side::Black)?;
        scan.events
            .push(event(move_index, Side::Black, black, annotation, delta));
    }

    scan.prior_black_eval = black_eval;
    Ok(scan)
}

fn error_annotation(half: &HalfMove) -> Option<&Annotation> {
    half.annotation.as_ref().filter(|a| a.is_error())
}

/// `before - after`, failing on a missing evaluation or mate minus mate.
fn swing(
    before: Option<EvalValue>,
    after: Option<EvalValue>,
    move_index: u32,
    side: Side,
) -> Result<EvalValue, AnalysisError> {
    let (Some(before), Some(after)) = (before, after) else {
        return Err(AnalysisError::MissingEvaluation { move_index, side });
    };
    before
        .checked_sub(after)
        .ok_or(AnalysisError::AmbiguousEvaluation { move_index, side })
}

fn event(
    move_index: u32,
    side: Side,
    half: &HalfMove,
    annotation: &Annotation,
    eval_delta: EvalValue,
) -> BlunderEvent {
    BlunderEvent {
        move_index,
        side,
        move_text: half.move_text.clone(),
        annotation: annotation.clone(),
        eval_delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::enrich;
    use crate::tokenizer::tokenize;

    fn blunders(text: &str) -> Result<Vec<BlunderEvent>, AnalysisError> {
        let plies = enrich(tokenize(text)?)?;
        classify(&plies)
    }

    #[test]
    fn test_black_swing_against_white_eval() {
        let events = blunders("1. e4 1.5 2... e5 1.2?! 2. Nf3 1.0 Nc6").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].move_index, 1);
        assert_eq!(events[0].side, Side::Black);
        assert_eq!(events[0].move_text, "e5");
        assert_eq!(events[0].annotation, Annotation::Dubious);
        assert_eq!(events[0].eval_delta, EvalValue::score(1.2 - 1.5));
    }

    #[test]
    fn test_white_swing_against_prior_black_eval() {
        let events = blunders("1. e4 0.3 1... e5 0.2 2. Qh5? -1.0 2... Nc6 -0.9").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].move_index, 2);
        assert_eq!(events[0].side, Side::White);
        assert_eq!(events[0].annotation, Annotation::Mistake);
        assert_eq!(events[0].eval_delta, EvalValue::score(0.2 - (-1.0)));
    }

    #[test]
    fn test_first_white_move_measured_from_zero() {
        let events = blunders("1. f3? -0.5 1... e5 -0.4").unwrap();
        assert_eq!(events[0].eval_delta, EvalValue::score(0.5));
    }

    #[test]
    fn test_trailing_white_move_is_not_scanned() {
        let events = blunders("1. e4 0.2 1... e5 0.2 2. Qh5?? -3.0").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_one_event_per_error_glyph() {
        let text = "1. e4? 0.1 1... e5?? 0.9 2. Nf3! 0.8 2... Nc6!! 0.7 3. Bc4?! 0.2 3... Nf6 0.3";
        let events = blunders(text).unwrap();
        let glyphs: Vec<&str> = events.iter().map(|e| e.annotation.glyph()).collect();
        assert_eq!(glyphs, vec!["?", "??", "?!"]);
        assert!(events.len() <= 2 * 3);
    }

    #[test]
    fn test_mate_swing_is_infinite() {
        let events = blunders("1. e4 0.2 1... f6? 0.8 2. Qh5 #1 2... g5?? #1").unwrap();
        assert_eq!(events.len(), 2);
        // Black's "#1" is a mate against Black.
        assert_eq!(events[1].eval_delta, EvalValue::MATE_AGAINST);
    }

    #[test]
    fn test_mate_minus_mate_is_ambiguous() {
        assert_eq!(
            blunders("1. e4 -#2 1... e5? #2"),
            Err(AnalysisError::AmbiguousEvaluation {
                move_index: 1,
                side: Side::Black
            })
        );
    }

    #[test]
    fn test_missing_white_eval_only_fails_when_needed() {
        assert!(blunders("1. e4 0.2 1... e5 0.1 2. Nf3 2... Nc6 0.3").is_ok());
        assert_eq!(
            blunders("1. e4 0.2 1... e5 0.1 2. Nf3? 2... Nc6 0.3"),
            Err(AnalysisError::MissingEvaluation {
                move_index: 2,
                side: Side::White
            })
        );
    }

    #[test]
    fn test_black_fallback_feeds_next_white_swing() {
        // 1... e5 has no eval and inherits 0.4 from White.
        let events = blunders("1. e4 0.4 1... e5 2. g4? -0.6 2... d5 -0.2").unwrap();
        assert_eq!(events[0].eval_delta, EvalValue::score(0.4 - (-0.6)));
    }
}
