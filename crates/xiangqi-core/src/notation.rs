//! Localized (traditional Chinese) move notation.
//!
//! Red counts files 9..1 right-to-left in Chinese numerals; black counts
//! 1..9 left-to-right in Arabic digits. The destination digit is a file
//! number for advisor/elephant/horse moves and a travel distance for the
//! line-moving pieces; that asymmetry is a rule of the notation itself.

use crate::board::{Color, Piece, PieceKind, Square};

const CN_DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

pub fn chinese_digit(n: u8) -> char {
    CN_DIGITS[n as usize % 10]
}

/// Display glyph for a piece, color-specific (red 炮 vs black 包 etc.).
pub fn piece_glyph(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::Red, PieceKind::King) => '帥',
        (Color::Red, PieceKind::Advisor) => '仕',
        (Color::Red, PieceKind::Elephant) => '相',
        (Color::Red, PieceKind::Horse) => '傌',
        (Color::Red, PieceKind::Chariot) => '俥',
        (Color::Red, PieceKind::Cannon) => '炮',
        (Color::Red, PieceKind::Soldier) => '兵',
        (Color::Black, PieceKind::King) => '將',
        (Color::Black, PieceKind::Advisor) => '士',
        (Color::Black, PieceKind::Elephant) => '象',
        (Color::Black, PieceKind::Horse) => '馬',
        (Color::Black, PieceKind::Chariot) => '車',
        (Color::Black, PieceKind::Cannon) => '包',
        (Color::Black, PieceKind::Soldier) => '卒',
    }
}

/// Resolve any accepted piece spelling (traditional, simplified, variant
/// glyphs or WXF letters) to its kind. Color is not encoded by the glyph.
pub fn piece_kind_from_glyph(glyph: char) -> Option<PieceKind> {
    match glyph {
        '車' | '俥' | '车' => Some(PieceKind::Chariot),
        '馬' | '傌' | '马' => Some(PieceKind::Horse),
        '炮' | '砲' | '包' => Some(PieceKind::Cannon),
        '兵' | '卒' => Some(PieceKind::Soldier),
        '相' | '象' => Some(PieceKind::Elephant),
        '仕' | '士' => Some(PieceKind::Advisor),
        '將' | '帥' | '将' | '帅' => Some(PieceKind::King),
        'R' | 'r' => Some(PieceKind::Chariot),
        'N' | 'n' | 'H' | 'h' => Some(PieceKind::Horse),
        'C' | 'c' => Some(PieceKind::Cannon),
        'P' | 'p' | 'S' | 's' => Some(PieceKind::Soldier),
        'B' | 'b' | 'E' | 'e' => Some(PieceKind::Elephant),
        'A' | 'a' => Some(PieceKind::Advisor),
        'K' | 'k' => Some(PieceKind::King),
        _ => None,
    }
}

/// Numeric value of a file/destination character, Chinese or Arabic.
pub fn digit_value(ch: char) -> Option<u8> {
    if let Some(d) = ch.to_digit(10) {
        return Some(d as u8);
    }
    CN_DIGITS.iter().position(|&c| c == ch).map(|i| i as u8)
}

/// A side's own file number (1-9) for a board column.
pub fn own_file(col: u8, color: Color) -> u8 {
    if color.is_red() {
        9 - col
    } else {
        col + 1
    }
}

/// Board column for a side's own file number.
pub fn file_to_col(file: u8, color: Color) -> u8 {
    if color.is_red() {
        9 - file
    } else {
        file - 1
    }
}

fn side_digit(n: u8, color: Color) -> String {
    if color.is_red() {
        chinese_digit(n).to_string()
    } else {
        n.to_string()
    }
}

/// The one-line localized description of a move, e.g. 炮二平五.
pub fn localized_notation(from: Square, to: Square, piece: Piece) -> String {
    let color = piece.color;
    let from_file = own_file(from.col, color);
    let to_file = own_file(to.col, color);
    let dr = to.row as i32 - from.row as i32;

    let (dir, dest) = if dr == 0 {
        ('平', side_digit(to_file, color))
    } else {
        let forward = if color.is_red() { dr < 0 } else { dr > 0 };
        let dir = if forward { '進' } else { '退' };
        let dest = if piece.kind.is_linear() {
            side_digit(dr.unsigned_abs() as u8, color)
        } else {
            side_digit(to_file, color)
        };
        (dir, dest)
    };

    format!(
        "{}{}{}{}",
        piece_glyph(piece),
        side_digit(from_file, color),
        dir,
        dest
    )
}
