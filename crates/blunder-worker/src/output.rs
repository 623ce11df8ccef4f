//! JSON Lines output, one object per analyzed game.

use std::io::Write;

use blunder_core::{BlunderEvent, EnrichedPly};
use serde::Serialize;

use crate::batch::{GameOutcome, GameRecords};
use crate::error::WorkerError;

#[derive(Serialize)]
struct GameLine<'a> {
    source: &'a str,
    line: usize,
    plies: &'a [EnrichedPly],
    blunders: &'a [BlunderEvent],
}

#[derive(Serialize)]
struct RecordsLine<'a> {
    source: &'a str,
    line: usize,
    #[serde(flatten)]
    records: &'a GameRecords,
}

/// Write successful outcomes; failed games were already logged and are left
/// out. Returns the number of lines written.
pub fn write_json_lines<W: Write>(
    mut writer: W,
    outcomes: &[GameOutcome],
) -> Result<usize, WorkerError> {
    let mut written = 0;
    for outcome in outcomes {
        let Ok(game) = &outcome.result else {
            continue;
        };

        match &game.records {
            Some(records) => serde_json::to_writer(
                &mut writer,
                &RecordsLine {
                    source: &outcome.source,
                    line: outcome.line,
                    records,
                },
            )?,
            None => serde_json::to_writer(
                &mut writer,
                &GameLine {
                    source: &outcome.source,
                    line: outcome.line,
                    plies: &game.analysis.plies,
                    blunders: &game.analysis.blunders,
                },
            )?,
        }
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::run_batch;
    use crate::config::{SwingRange, WorkerConfig};
    use crate::input::GameInput;

    fn report(records: bool) -> Vec<GameOutcome> {
        let games = vec![
            GameInput {
                source: "a.pgn".to_string(),
                line: 3,
                movetext: "1. e4 0.2 1... e5?? 2.5".to_string(),
            },
            GameInput {
                source: "a.pgn".to_string(),
                line: 7,
                movetext: "garbage".to_string(),
            },
        ];
        let config = WorkerConfig {
            workers: 1,
            require_eval: false,
            swing_range: SwingRange::default(),
            records,
        };
        run_batch(&games, &config).outcomes
    }

    #[test]
    fn test_writes_one_line_per_successful_game() {
        let mut buf = Vec::new();
        let written = write_json_lines(&mut buf, &report(false)).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["source"], "a.pgn");
        assert_eq!(value["line"], 3);
        assert_eq!(value["plies"][0]["black"]["move_text"], "e5");
        assert_eq!(value["blunders"][0]["annotation"], "??");
    }

    #[test]
    fn test_records_layout() {
        let mut buf = Vec::new();
        write_json_lines(&mut buf, &report(true)).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(String::from_utf8(buf).unwrap().trim()).unwrap();
        assert_eq!(value["moves"][0]["piece"], "P");
        assert_eq!(value["moves"][0]["square_or_tag"], "e4");
        assert_eq!(value["blunders"][0]["remaining_pieces"], 16);
    }
}
