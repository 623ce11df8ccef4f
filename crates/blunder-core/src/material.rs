//! Running material counts inferred from capture markers.
//!
//! Every `x` in a move removes one piece from the opponent. En passant and
//! promotion are not modelled beyond that.

use serde::Serialize;

use crate::game_data::ParsedPly;

pub const STARTING_PIECES: u8 = 16;

/// Pieces left for each side at the moment it moves on a ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialCount {
    pub white: u8,
    /// `None` when the ply has no Black half-move.
    pub black: Option<u8>,
}

/// Counters carried from one ply to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialState {
    pub white_left: u8,
    pub black_left: u8,
}

impl Default for MaterialState {
    fn default() -> Self {
        Self {
            white_left: STARTING_PIECES,
            black_left: STARTING_PIECES,
        }
    }
}

impl MaterialState {
    /// Apply one ply's captures, returning the counts recorded for it and the
    /// state handed to the next ply.
    pub fn step(self, ply: &ParsedPly) -> (MaterialCount, MaterialState) {
        let mut next = self;

        if ply.white.is_capture() {
            next.black_left = next.black_left.saturating_sub(1);
        }

        let black = ply.black.as_ref().map(|black| {
            let remaining = next.black_left;
            if black.is_capture() {
                next.white_left = next.white_left.saturating_sub(1);
            }
            remaining
        });

        let count = MaterialCount {
            white: self.white_left,
            black,
        };
        (count, next)
    }
}

/// Material counts for every ply, in order.
pub fn track_material(plies: &[ParsedPly]) -> Vec<MaterialCount> {
    plies
        .iter()
        .scan(MaterialState::default(), |state, ply| {
            let (count, next) = state.step(ply);
            *state = next;
            Some(count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_first_white_move_starts_at_sixteen() {
        let plies = tokenize("1. e4 e5").unwrap();
        let counts = track_material(&plies);
        assert_eq!(
            counts,
            vec![MaterialCount {
                white: 16,
                black: Some(16)
            }]
        );
    }

    #[test]
    fn test_captures_reduce_opponent_counts() {
        // 3. Nxe5 takes a black pawn, 3... Nxe5 takes back.
        let plies = tokenize("1. e4 e5 2. Nf3 Nc6 3. Nxe5 Nxe5 4. d4 Qh4 5. dxe5").unwrap();
        let counts = track_material(&plies);

        assert_eq!(counts[2], MaterialCount { white: 16, black: Some(15) });
        assert_eq!(counts[3], MaterialCount { white: 15, black: Some(15) });
        assert_eq!(counts[4], MaterialCount { white: 15, black: None });
    }

    #[test]
    fn test_counts_never_underflow() {
        let mut text = String::new();
        for n in 1..=20 {
            text.push_str(&format!("{n}. Qxd7 Qxd2 "));
        }
        let counts = track_material(&tokenize(&text).unwrap());
        assert_eq!(counts.last().unwrap().black, Some(0));
        assert_eq!(counts.last().unwrap().white, 0);
    }

    #[test]
    fn test_counts_are_monotone_per_side() {
        let plies =
            tokenize("1. e4 d5 2. exd5 Qxd5 3. Nc3 Qa5 4. d4 c6 5. Nf3 Bg4 6. Bf4 e6 7. h3 Bxf3")
                .unwrap();
        let counts = track_material(&plies);
        for pair in counts.windows(2) {
            assert!(pair[1].white <= pair[0].white);
            assert!(pair[1].black <= pair[0].black);
        }
        assert_eq!(counts[6], MaterialCount { white: 15, black: Some(15) });
    }
}
