//! Post-drill scoring: per-ply verdicts over the line that was played,
//! an aggregate accuracy score, and a letter grade.

use serde::Serialize;

use xiangqi_core::NodeId;

use crate::session::PracticeSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlyOutcome {
    /// Played with no miss recorded at the position before it.
    Correct,
    /// At least one miss was recorded at the position before it.
    Erred,
    /// Ply before the drill's start node; not graded.
    OutsideRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
}

impl Grade {
    pub fn from_score(score: u32) -> Grade {
        match score {
            100.. => Grade::S,
            80..=99 => Grade::A,
            60..=79 => Grade::B,
            _ => Grade::C,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Grade::S => 'S',
            Grade::A => 'A',
            Grade::B => 'B',
            Grade::C => 'C',
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlyReport {
    pub node: NodeId,
    pub round: usize,
    pub notation: String,
    pub outcome: PlyOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeReport {
    pub plies: Vec<PlyReport>,
    pub successes: u32,
    /// Total misses, counting repeats at the same position.
    pub error_count: u32,
    /// Percentage of answered positions that were answered cleanly.
    pub score: u32,
    pub grade: Grade,
}

pub(crate) fn build_report(session: &PracticeSession) -> PracticeReport {
    let tree = session.tree();
    let path = tree
        .path_to_root(session.current())
        .unwrap_or_else(|| vec![tree.root_id()]);

    let start_index = path
        .iter()
        .position(|&id| id == session.start_node())
        .unwrap_or(0);

    let mut plies = Vec::new();
    for (offset, id) in path.into_iter().enumerate().skip(1) {
        let Some(node) = tree.node(id) else { continue };
        let outcome = if offset < start_index {
            PlyOutcome::OutsideRange
        } else if node
            .parent
            .is_some_and(|p| session.errors().iter().any(|e| e.node == p))
        {
            PlyOutcome::Erred
        } else {
            PlyOutcome::Correct
        };
        plies.push(PlyReport {
            node: id,
            round: tree.round_number(id),
            notation: node.notation().unwrap_or_default().to_string(),
            outcome,
        });
    }

    let error_count: u32 = session.errors().iter().map(|e| e.count).sum();
    let successes = session.successes();
    let score = successes * 100 / (successes + error_count).max(1);
    PracticeReport {
        plies,
        successes,
        error_count,
        score,
        grade: Grade::from_score(score),
    }
}
