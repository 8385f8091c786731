//! Xiangqi game-notation engine: position codec, multi-dialect notation
//! parsing, a branching move tree with copy-on-write edits, navigation
//! over it, transposition linking and interchange-format export.

pub mod board;
pub mod error;
pub mod export;
pub mod fen;
pub mod game_data;
pub mod import;
pub mod notation;
pub mod tree;

pub use board::{Board, Color, Move, Piece, PieceKind, Square};
pub use error::EngineError;
pub use fen::{base_fen, decode_fen, encode_fen, STARTING_FEN};
pub use game_data::{GameMetadata, GameResult, ParsedMove};
pub use import::{parse_record, ParsedGame};
pub use tree::link::LinkReport;
pub use tree::navigate::Step;
pub use tree::{Direction, MoveNode, MoveTree, NodeId};
