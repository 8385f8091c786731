//! Position string codec. The format follows the common Xiangqi FEN
//! convention: 10 slash-separated rows with run-length-encoded empties,
//! `w`/`b` for the side to move, and fixed placeholder counter fields.

use crate::board::{Board, Color, Piece, PieceKind, Square, COLS, ROWS};
use crate::error::EngineError;

pub const STARTING_FEN: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// Serialize a board plus side-to-move. Move counters are not modeled;
/// the tail is always the placeholder `- - 0 1`.
pub fn encode_fen(board: &Board, turn: Color) -> String {
    let mut out = String::new();
    for row in 0..ROWS {
        let mut empty = 0;
        for col in 0..COLS {
            match board.get(Square::new(row as u8, col as u8)) {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.letter());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if row < ROWS - 1 {
            out.push('/');
        }
    }
    out.push(' ');
    out.push(if turn.is_red() { 'w' } else { 'b' });
    out.push_str(" - - 0 1");
    out
}

/// Parse a position string back into a board and side-to-move.
pub fn decode_fen(fen: &str) -> Result<(Board, Color), EngineError> {
    let mut fields = fen.split_whitespace();
    let layout = fields
        .next()
        .ok_or_else(|| EngineError::MalformedPosition(fen.to_string()))?;

    let rows: Vec<&str> = layout.split('/').collect();
    if rows.len() != ROWS {
        return Err(EngineError::MalformedPosition(format!(
            "expected {} rows, got {}",
            ROWS,
            rows.len()
        )));
    }

    let mut board = Board::empty();
    for (row, cells) in rows.iter().enumerate() {
        let mut col = 0usize;
        for ch in cells.chars() {
            if let Some(digit) = ch.to_digit(10) {
                col += digit as usize;
            } else {
                let kind = PieceKind::from_letter(ch).ok_or_else(|| {
                    EngineError::MalformedPosition(format!("unrecognized piece letter '{ch}'"))
                })?;
                let color = if ch.is_ascii_uppercase() {
                    Color::Red
                } else {
                    Color::Black
                };
                if col >= COLS {
                    return Err(EngineError::MalformedPosition(format!(
                        "row {row} overflows {COLS} columns"
                    )));
                }
                board.set(Square::new(row as u8, col as u8), Some(Piece::new(kind, color)));
                col += 1;
            }
        }
        if col != COLS {
            return Err(EngineError::MalformedPosition(format!(
                "row {row} sums to {col} columns, expected {COLS}"
            )));
        }
    }

    let turn = match fields.next() {
        Some("b") => Color::Black,
        _ => Color::Red,
    };
    Ok((board, turn))
}

/// Board-plus-turn prefix with the counter fields dropped. Two nodes
/// represent the same position exactly when their base strings match.
pub fn base_fen(fen: &str) -> String {
    fen.split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position_encodes_to_starting_fen() {
        assert_eq!(encode_fen(&Board::initial(), Color::Red), STARTING_FEN);
    }

    #[test]
    fn test_round_trip_initial() {
        let (board, turn) = decode_fen(STARTING_FEN).unwrap();
        assert_eq!(board, Board::initial());
        assert_eq!(turn, Color::Red);
        assert_eq!(encode_fen(&board, turn), STARTING_FEN);
    }

    #[test]
    fn test_round_trip_sparse_position() {
        // Kings and a lone red soldier only.
        let mut board = Board::empty();
        board.set(Square::new(0, 4), Some(Piece::new(PieceKind::King, Color::Black)));
        board.set(Square::new(9, 4), Some(Piece::new(PieceKind::King, Color::Red)));
        board.set(Square::new(2, 4), Some(Piece::new(PieceKind::Soldier, Color::Red)));

        let fen = encode_fen(&board, Color::Black);
        let (decoded, turn) = decode_fen(&fen).unwrap();
        assert_eq!(decoded, board);
        assert_eq!(turn, Color::Black);
    }

    #[test]
    fn test_decode_rejects_short_row() {
        let bad = "rnbakabnr/8/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";
        assert!(matches!(
            decode_fen(bad),
            Err(EngineError::MalformedPosition(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_letter() {
        let bad = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNQ w - - 0 1";
        assert!(matches!(
            decode_fen(bad),
            Err(EngineError::MalformedPosition(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_row_count() {
        assert!(decode_fen("9/9/9 w - - 0 1").is_err());
    }

    #[test]
    fn test_base_fen_drops_counters() {
        assert_eq!(
            base_fen(STARTING_FEN),
            "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w"
        );
    }
}
