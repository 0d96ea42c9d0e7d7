//! The line-oriented turn protocol: read the opponent's last move (or the
//! `-1 -1` sentinel for "we move first"), read and discard a list of
//! pre-enumerated valid actions, then write our chosen move back.
//!
//! A thin adapter that owns no search logic of its own, just line parsing
//! and dispatch to the engine. Kept deliberately minimal: I/O concerns are
//! an external collaborator to the search core, so nothing here beyond
//! parsing and dispatch belongs in this module.

use std::io::{BufRead, Write};

use crate::board::{apply, Board};
use crate::constants::NO_MOVE;
use crate::error::{EngineError, Result};
use crate::search::Driver;

/// Run the turn loop until the input stream is exhausted (or a protocol
/// error occurs). One call plays one full game.
pub fn run<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, driver: &mut Driver) -> Result<()> {
    let mut board = Board::empty();
    let mut last_move = NO_MOVE;
    let mut player: i8 = 1;
    let mut turn: u32 = 0;

    loop {
        let Some(line) = read_line(reader)? else {
            return Ok(()); // stream closed between turns: normal shutdown.
        };
        let (opponent_row, opponent_col) = parse_two_ints(&line)?;

        let count_line = read_required_line(reader)?;
        let valid_action_count: usize = count_line
            .trim()
            .parse()
            .map_err(|_| EngineError::Protocol(format!("bad valid-action count: {count_line:?}")))?;
        for _ in 0..valid_action_count {
            read_required_line(reader)?; // enumerated legal moves: informational only.
        }

        if opponent_row != -1 {
            last_move = (opponent_row as usize) * 9 + opponent_col as usize;
            apply(&mut board, last_move, player);
            player = -player;
            turn += 1;
        }

        let (mv, _stats) = driver.choose_move(&board, last_move, turn, player)?;
        apply(&mut board, mv, player);
        writeln!(writer, "{} {}", mv / 9, mv % 9)
            .map_err(|e| EngineError::Protocol(format!("write failed: {e}")))?;

        player = -player;
        turn += 1;
        last_move = mv;
    }
}

/// Read one line, returning `None` at a clean EOF (no partial line pending).
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = reader
        .read_line(&mut buf)
        .map_err(|e| EngineError::Protocol(format!("read failed: {e}")))?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(buf))
}

fn read_required_line<R: BufRead>(reader: &mut R) -> Result<String> {
    read_line(reader)?.ok_or_else(|| EngineError::Protocol("unexpected end of input".to_string()))
}

fn parse_two_ints(line: &str) -> Result<(i32, i32)> {
    let mut it = line.split_whitespace();
    let a = it
        .next()
        .ok_or_else(|| EngineError::Protocol(format!("missing first field: {line:?}")))?;
    let b = it
        .next()
        .ok_or_else(|| EngineError::Protocol(format!("missing second field: {line:?}")))?;
    let a: i32 = a
        .parse()
        .map_err(|_| EngineError::Protocol(format!("not an integer: {a:?}")))?;
    let b: i32 = b
        .parse()
        .map_err(|_| EngineError::Protocol(format!("not an integer: {b:?}")))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::EngineConfig;
    use std::io::Cursor;

    #[test]
    fn plays_opening_book_move_when_moving_first() {
        let input = "-1 -1\n0\n";
        let mut reader = Cursor::new(input.as_bytes());
        let mut output = Vec::new();
        let mut driver = Driver::new(EngineConfig::default());
        run(&mut reader, &mut output, &mut driver).unwrap();
        let out = String::from_utf8(output).unwrap();
        assert_eq!(out.trim(), "4 4"); // move 40: row 4, col 4.
    }

    #[test]
    fn applies_opponent_move_before_replying() {
        // We move first (book: center). Then the opponent plays 3 3 and the
        // stream ends; we should have produced exactly one reply line before
        // that point (the loop exits cleanly on EOF while waiting for a
        // third turn).
        let input = "-1 -1\n0\n3 3\n0\n";
        let mut reader = Cursor::new(input.as_bytes());
        let mut output = Vec::new();
        let mut config = EngineConfig::default();
        config.deadline_ms = 5;
        let mut driver = Driver::new(config);
        run(&mut reader, &mut output, &mut driver).unwrap();
        let out = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "4 4");
    }

    #[test]
    fn rejects_malformed_move_line() {
        let input = "not a move\n";
        let mut reader = Cursor::new(input.as_bytes());
        let mut output = Vec::new();
        let mut driver = Driver::new(EngineConfig::default());
        let err = run(&mut reader, &mut output, &mut driver).unwrap_err();
        assert!(matches!(err, EngineError::Protocol(_)));
    }
}
