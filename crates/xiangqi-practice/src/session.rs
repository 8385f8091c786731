//! The memorization drill: the player replays one side of a studied
//! tree from memory while the computer answers for the other side.
//!
//! The session is a plain state machine; timing lives outside it (see
//! [`crate::timer`]). Every scheduled computer reply carries the
//! generation it was armed under, so replies scheduled before a stop or
//! restart land harmlessly.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use xiangqi_core::{Color, MoveTree, NodeId, Square};

use crate::range::VariationRange;
use crate::report::{build_report, PracticeReport};
use crate::timer::DEFAULT_DELAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPlayerMove,
    AwaitingComputerMove,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeSide {
    Red,
    Black,
    /// The player answers for both sides; the computer never moves.
    Both,
}

impl PracticeSide {
    pub fn covers(self, color: Color) -> bool {
        match self {
            PracticeSide::Red => color == Color::Red,
            PracticeSide::Black => color == Color::Black,
            PracticeSide::Both => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeMode {
    /// The computer always follows variation A.
    Mainline,
    /// The computer picks uniformly among the variations in scope.
    Random,
}

#[derive(Debug, Clone)]
pub struct PracticeConfig {
    /// Which side the player drills.
    pub player_side: PracticeSide,
    pub mode: PracticeMode,
    /// Which variations the computer may choose at decision points.
    /// Player moves are always judged against the full slate.
    pub range: VariationRange,
    /// Delay before a scheduled computer reply is played.
    pub computer_delay: Duration,
}

impl Default for PracticeConfig {
    fn default() -> PracticeConfig {
        PracticeConfig {
            player_side: PracticeSide::Red,
            mode: PracticeMode::Random,
            range: VariationRange::All,
            computer_delay: DEFAULT_DELAY,
        }
    }
}

/// A mistake, keyed by the node whose position it was made in. Repeat
/// misses at the same position bump the count instead of adding rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub node: NodeId,
    pub round: usize,
    /// The notations that would have been accepted.
    pub expected: Vec<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveVerdict {
    /// The move matched a recorded variation; play advanced to it.
    Correct(NodeId),
    Wrong { expected: Vec<String> },
    /// It is not the player's turn (or the session is not running).
    Rejected,
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    tree: MoveTree,
    current: NodeId,
    /// Where the drill began; the report grades nothing before it.
    start: NodeId,
    config: PracticeConfig,
    state: SessionState,
    generation: u64,
    successes: u32,
    errors: Vec<RecordedError>,
}

impl PracticeSession {
    pub fn start(tree: MoveTree, config: PracticeConfig) -> PracticeSession {
        let root = tree.root_id();
        PracticeSession::start_at(tree, root, config)
    }

    /// Begin a drill mid-study. An id no longer present in the tree
    /// falls back to the root.
    pub fn start_at(tree: MoveTree, at: NodeId, config: PracticeConfig) -> PracticeSession {
        let current = tree.node_or_root(at).id;
        let mut session = PracticeSession {
            tree,
            current,
            start: current,
            config,
            state: SessionState::Idle,
            generation: 1,
            successes: 0,
            errors: Vec::new(),
        };
        session.state = session.next_state();
        info!(state = ?session.state, "practice session started");
        session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn start_node(&self) -> NodeId {
        self.start
    }

    /// The generation a computer-reply timer must echo back to be acted
    /// on; stopping or restarting invalidates all earlier generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tree(&self) -> &MoveTree {
        &self.tree
    }

    pub fn config(&self) -> &PracticeConfig {
        &self.config
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn errors(&self) -> &[RecordedError] {
        &self.errors
    }

    fn side_to_move(&self) -> Color {
        self.tree.node_or_root(self.current).turn
    }

    /// Continuations the computer may pick at a decision point. The
    /// configured range filters the slate; an intersection that excludes
    /// every variation falls back to the full slate rather than
    /// stalling.
    pub fn computer_scope(&self) -> Vec<NodeId> {
        let children = self.tree.children(self.current);
        if children.len() <= 1 {
            return children.to_vec();
        }
        let filtered: Vec<NodeId> = children
            .iter()
            .enumerate()
            .filter(|(slot, _)| self.config.range.allows(*slot))
            .map(|(_, id)| *id)
            .collect();
        if filtered.is_empty() {
            children.to_vec()
        } else {
            filtered
        }
    }

    fn next_state(&self) -> SessionState {
        if self.tree.children(self.current).is_empty() {
            SessionState::Finished
        } else if self.config.player_side.covers(self.side_to_move()) {
            SessionState::AwaitingPlayerMove
        } else {
            SessionState::AwaitingComputerMove
        }
    }

    fn expected_notations(&self) -> Vec<String> {
        self.tree
            .children(self.current)
            .iter()
            .filter_map(|id| self.tree.node(*id).and_then(|n| n.notation().map(String::from)))
            .collect()
    }

    /// Judge a move the player plays from memory, by exact origin and
    /// destination against every recorded continuation. Correct moves
    /// advance the session; wrong ones are recorded against the current
    /// position and leave it unchanged so the player can retry.
    pub fn propose_move(&mut self, from: Square, to: Square) -> MoveVerdict {
        if self.state != SessionState::AwaitingPlayerMove {
            return MoveVerdict::Rejected;
        }
        let hit = self.tree.children(self.current).iter().copied().find(|id| {
            self.tree
                .node(*id)
                .and_then(|n| n.mv.as_ref())
                .is_some_and(|m| m.from == from && m.to == to)
        });
        match hit {
            Some(id) => {
                self.successes += 1;
                self.advance(id);
                MoveVerdict::Correct(id)
            }
            None => self.record_miss(),
        }
    }

    fn record_miss(&mut self) -> MoveVerdict {
        let expected = self.expected_notations();
        match self.errors.iter_mut().find(|e| e.node == self.current) {
            Some(entry) => entry.count += 1,
            None => self.errors.push(RecordedError {
                node: self.current,
                round: self.tree.round_number(self.current),
                expected: expected.clone(),
                count: 1,
            }),
        }
        MoveVerdict::Wrong { expected }
    }

    fn advance(&mut self, id: NodeId) {
        self.current = id;
        self.state = self.next_state();
        if self.state == SessionState::Finished {
            info!(
                successes = self.successes,
                errors = self.errors.len(),
                "practice line completed"
            );
        }
    }

    /// Play the computer's reply for a timer that fired. A stale
    /// generation, or a state that no longer expects a computer move,
    /// is discarded. At decision points the reply is drawn uniformly
    /// from the variations in scope.
    pub fn on_computer_timer(&mut self, generation: u64, rng: &mut impl Rng) -> Option<NodeId> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale computer timer");
            return None;
        }
        if self.state != SessionState::AwaitingComputerMove {
            return None;
        }
        let replies = self.computer_scope();
        let pick = match self.config.mode {
            PracticeMode::Mainline => replies[0],
            PracticeMode::Random => replies[rng.random_range(0..replies.len())],
        };
        self.advance(pick);
        Some(pick)
    }

    /// End the session; pending timers become stale.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }

    /// Back to the start node with fresh statistics. The error table
    /// survives a restart so repeated drills accumulate.
    pub fn restart(&mut self) {
        self.generation += 1;
        self.current = self.start;
        self.successes = 0;
        self.state = self.next_state();
    }

    pub fn report(&self) -> PracticeReport {
        build_report(self)
    }
}
