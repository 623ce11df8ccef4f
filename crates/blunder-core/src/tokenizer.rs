//! Move-text tokenizer, a lightweight regex-based splitter.
//!
//! Targets the annotated export dialect where every half-move may be followed
//! by an engine evaluation and an annotation glyph:
//!
//! ```text
//! 1. e4 { [%eval 0.17] } 1... c5?! { [%eval 0.6] } 2. Nf3 0.4 2... d6 0.5
//! ```
//!
//! Plain SAN (`1. e4 e5 2. Nf3 Nc6`) is accepted too: when a move number has
//! no `N...` marker, the second move-like token starts Black's half-move.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::AnalysisError;
use crate::game_data::{Annotation, HalfMove, ParsedPly};

/// `12. ` starts a full move.
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\s").unwrap());

/// ` 12... ` starts Black's half of a full move.
static BLACK_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\d+\.\.\.\s").unwrap());

/// `[%eval 0.17]` / `[%eval #-3]` comment tag.
static EVAL_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[%eval\s+(-?#[+-]?\d+|[+-]?\d+(?:\.\d+)?)").unwrap()
});

/// Bare mate (`#3`, `-#2`) or decimal (`-0.25`) evaluation.
static EVAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?#[+-]?\d+|[+-]?\d+\.\d+").unwrap());

static GLYPH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[!?]+").unwrap());

static MOVE_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:O-O|[KQRBN][a-h]?[1-8]?x?[a-h][1-8]|[a-h](?:x[a-h])?[1-8])").unwrap()
});

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Split one game's move text into plies.
pub fn tokenize(movetext: &str) -> Result<Vec<ParsedPly>, AnalysisError> {
    let mut chunks = MOVE_NUMBER_RE.split(movetext);
    // Anything before "1. " is not part of the move list.
    chunks.next();

    let plies = chunks
        .enumerate()
        .map(|(i, chunk)| parse_chunk(i as u32 + 1, chunk))
        .collect::<Result<Vec<_>, _>>()?;

    if plies.is_empty() {
        return Err(AnalysisError::MalformedGame(
            "no move-number markers".to_string(),
        ));
    }

    // Only the final ply may lack Black's half-move.
    if let Some(ply) = plies[..plies.len() - 1].iter().find(|p| p.black.is_none()) {
        return Err(AnalysisError::MalformedGame(format!(
            "move {} has no black half-move",
            ply.move_index
        )));
    }

    debug!(plies = plies.len(), "Tokenized move text");
    Ok(plies)
}

fn parse_chunk(move_index: u32, chunk: &str) -> Result<ParsedPly, AnalysisError> {
    let halves: Vec<&str> = BLACK_MARKER_RE.split(chunk).collect();
    let (white_text, black_text) = match halves.as_slice() {
        [white] => split_unmarked(white),
        [white, black] => (*white, Some(*black)),
        _ => {
            return Err(AnalysisError::MalformedGame(format!(
                "move {move_index} has more than two half-moves"
            )))
        }
    };

    let white = parse_half_move(move_index, white_text)?;
    let black = black_text
        .map(|text| parse_half_move(move_index, text))
        .transpose()?;

    Ok(ParsedPly {
        move_index,
        white,
        black,
    })
}

/// Find Black's move in a chunk written without a `N...` marker.
fn split_unmarked(chunk: &str) -> (&str, Option<&str>) {
    let mut depth = 0i32;
    for (n, token) in TOKEN_RE.find_iter(chunk).enumerate() {
        let s = token.as_str();
        if n > 0 && depth == 0 && MOVE_START_RE.is_match(s) {
            return (&chunk[..token.start()], Some(&chunk[token.start()..]));
        }
        for c in s.chars() {
            match c {
                '{' | '(' => depth += 1,
                '}' | ')' => depth -= 1,
                _ => {}
            }
        }
    }
    (chunk, None)
}

fn parse_half_move(move_index: u32, text: &str) -> Result<HalfMove, AnalysisError> {
    let text = text.trim();
    let (token, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));

    let move_text = clean_move(token);
    if move_text.is_empty() {
        return Err(AnalysisError::MalformedGame(format!(
            "move {move_index} has an empty half-move"
        )));
    }

    let raw_eval = EVAL_TAG_RE
        .captures(rest)
        .and_then(|cap| cap.get(1))
        .or_else(|| EVAL_RE.find(rest))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let annotation = glyph_token(token, rest)
        .and_then(|t| GLYPH_RE.find(t))
        .map(|m| Annotation::from_glyph(m.as_str()));

    Ok(HalfMove {
        move_text,
        raw_eval,
        annotation,
    })
}

/// The token carrying the glyph: the move itself, or the evaluation right
/// after it (`e5 1.2?!`). Comments never carry one.
fn glyph_token<'a>(token: &'a str, rest: &'a str) -> Option<&'a str> {
    if GLYPH_RE.is_match(token) {
        return Some(token);
    }
    rest.split_whitespace()
        .next()
        .filter(|next| !next.starts_with(['{', '(']))
}

/// Drop check/mate marks, `=` and glyphs; keep letters, digits and `-`.
fn clean_move(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}
