//! Board model: 10x9 grid of pieces, squares and moves.

use serde::{Deserialize, Serialize};

pub const ROWS: usize = 10;
pub const COLS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    pub fn is_red(self) -> bool {
        self == Color::Red
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    King,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    /// Pieces that travel along ranks/files. Their localized notation
    /// destination is a travel distance; the others use a file number.
    pub fn is_linear(self) -> bool {
        matches!(
            self,
            PieceKind::Chariot | PieceKind::Cannon | PieceKind::Soldier | PieceKind::King
        )
    }

    /// Uppercase position-string letter (red); black uses lowercase.
    pub fn letter(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Advisor => 'A',
            PieceKind::Elephant => 'B',
            PieceKind::Horse => 'N',
            PieceKind::Chariot => 'R',
            PieceKind::Cannon => 'C',
            PieceKind::Soldier => 'P',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_uppercase() {
            'K' => Some(PieceKind::King),
            'A' => Some(PieceKind::Advisor),
            'B' => Some(PieceKind::Elephant),
            'N' => Some(PieceKind::Horse),
            'R' => Some(PieceKind::Chariot),
            'C' => Some(PieceKind::Cannon),
            'P' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    pub fn letter(self) -> char {
        let c = self.kind.letter();
        if self.color.is_red() {
            c
        } else {
            c.to_ascii_lowercase()
        }
    }
}

/// A board coordinate. Row 0 is black's back rank, row 9 red's; column 0
/// is the leftmost file as seen from red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Square {
        Square { row, col }
    }

    pub fn in_bounds(row: i32, col: i32) -> bool {
        (0..ROWS as i32).contains(&row) && (0..COLS as i32).contains(&col)
    }
}

/// One half-move, with its localized notation as recorded in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub notation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; COLS]; ROWS],
        }
    }

    /// The standard opening setup: black on rows 0-3, red on rows 6-9.
    pub fn initial() -> Board {
        let mut board = Board::empty();
        for (back_row, cannon_row, soldier_row, color) in
            [(0, 2, 3, Color::Black), (9, 7, 6, Color::Red)]
        {
            let back = [
                PieceKind::Chariot,
                PieceKind::Horse,
                PieceKind::Elephant,
                PieceKind::Advisor,
                PieceKind::King,
                PieceKind::Advisor,
                PieceKind::Elephant,
                PieceKind::Horse,
                PieceKind::Chariot,
            ];
            for (col, kind) in back.into_iter().enumerate() {
                board.squares[back_row][col] = Some(Piece::new(kind, color));
            }
            board.squares[cannon_row][1] = Some(Piece::new(PieceKind::Cannon, color));
            board.squares[cannon_row][7] = Some(Piece::new(PieceKind::Cannon, color));
            for col in (0..COLS).step_by(2) {
                board.squares[soldier_row][col] = Some(Piece::new(PieceKind::Soldier, color));
            }
        }
        board
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
    }

    /// Returns a new board with the piece at `from` relocated to `to`.
    /// The board itself is never mutated; every edit is a fresh value.
    pub fn apply(&self, from: Square, to: Square) -> Board {
        let mut next = self.clone();
        if let Some(piece) = next.get(from) {
            next.set(to, Some(piece));
            next.set(from, None);
        }
        next
    }

    /// All squares holding a piece of the given kind and color, scanned
    /// top-to-bottom, left-to-right.
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Vec<Square> {
        let mut found = Vec::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                if self.squares[row][col] == Some(Piece::new(kind, color)) {
                    found.push(Square::new(row as u8, col as u8));
                }
            }
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|piece| (Square::new(row as u8, col as u8), piece))
            })
        })
    }
}
