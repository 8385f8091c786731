use serde::{Deserialize, Serialize};

use crate::board::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameResult {
    #[default]
    Unknown,
    Red,
    Black,
    Draw,
}

impl GameResult {
    /// Localized label used by the text and bracket-tag exports.
    pub fn label(self) -> &'static str {
        match self {
            GameResult::Unknown => "",
            GameResult::Red => "紅勝",
            GameResult::Black => "黑勝",
            GameResult::Draw => "和局",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMetadata {
    pub title: String,
    pub event: String,
    pub date: String,
    pub result: GameResult,
    pub red_name: String,
    pub black_name: String,
}

/// One entry of the flat move list produced by the linear dialects,
/// before it is replayed into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMove {
    pub from: Square,
    pub to: Square,
    pub notation: String,
    pub comment: String,
}
