//! The canonical move tree: an arena of id-addressed nodes holding the
//! full variation history of a game. All structural edits are
//! copy-on-write — they take `&self` and return a fresh tree value, so a
//! caller never observes a half-applied mutation.

pub mod link;
pub mod navigate;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Color, Move, Square};
use crate::error::EngineError;
use crate::fen::encode_fen;
use crate::game_data::ParsedMove;
use crate::notation::localized_notation;

/// Opaque node identity; unique within a tree, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    /// `None` only for the root.
    #[serde(rename = "move")]
    pub mv: Option<Move>,
    /// Board snapshot after `mv` (the root holds the start position).
    pub board: Board,
    /// Side to move after this node.
    pub turn: Color,
    /// Cached; always re-derivable from `board` and `turn`.
    pub fen: String,
    pub comment: String,
    /// Ordered: index 0 is variation A, index 1 is B, and so on.
    pub children: Vec<NodeId>,
    /// Which child the main-line playback follows.
    pub preferred_child: Option<NodeId>,
}

impl MoveNode {
    pub fn notation(&self) -> Option<&str> {
        self.mv.as_ref().map(|m| m.notation.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTree {
    pub(crate) nodes: HashMap<NodeId, MoveNode>,
    pub(crate) root: NodeId,
    next_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Default for MoveTree {
    fn default() -> MoveTree {
        MoveTree::new()
    }
}

impl MoveTree {
    /// A tree holding only the standard starting position, red to move.
    pub fn new() -> MoveTree {
        MoveTree::with_start(Board::initial(), Color::Red)
    }

    pub fn with_start(board: Board, turn: Color) -> MoveTree {
        let root = NodeId(0);
        let fen = encode_fen(&board, turn);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            MoveNode {
                id: root,
                parent: None,
                mv: None,
                board,
                turn,
                fen,
                comment: String::new(),
                children: Vec::new(),
                preferred_child: None,
            },
        );
        MoveTree {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// Replay a flat move list from the given start position, chaining
    /// single-child nodes. Stops silently at the first move whose origin
    /// square is empty (the importer has already flagged truncation).
    pub fn from_moves(board: Board, turn: Color, moves: &[ParsedMove]) -> MoveTree {
        let mut tree = MoveTree::with_start(board, turn);
        let mut at = tree.root;
        for entry in moves {
            let parent = &tree.nodes[&at];
            if parent.board.get(entry.from).is_none() {
                break;
            }
            let id = tree.add_child(at, entry.from, entry.to, Some(entry.notation.clone()));
            if !entry.comment.is_empty() {
                if let Some(node) = tree.nodes.get_mut(&id) {
                    node.comment = entry.comment.clone();
                }
            }
            at = id;
        }
        tree
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&MoveNode> {
        self.nodes.get(&id)
    }

    /// Lookup that degrades to the root instead of failing; callers that
    /// hold a stale id fall back to the start position.
    pub fn node_or_root(&self, id: NodeId) -> &MoveNode {
        self.nodes.get(&id).unwrap_or(&self.nodes[&self.root])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        false // there is always a root
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn mint_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create a child under `parent` by applying the move to the parent's
    /// board. `notation` overrides the derived localized notation (the
    /// bracket importer passes `None` and lets it be derived). Marks the
    /// new child preferred. Internal; assumes a piece sits on `from`.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        from: Square,
        to: Square,
        notation: Option<String>,
    ) -> NodeId {
        let parent_node = &self.nodes[&parent];
        let piece = parent_node.board.get(from).unwrap_or_else(|| {
            // add_child callers check the origin square first.
            unreachable!("add_child on empty origin square")
        });
        let captured = parent_node.board.get(to);
        let board = parent_node.board.apply(from, to);
        let turn = parent_node.turn.opponent();
        let fen = encode_fen(&board, turn);
        let notation = notation.unwrap_or_else(|| localized_notation(from, to, piece));

        let id = self.mint_id();
        self.nodes.insert(
            id,
            MoveNode {
                id,
                parent: Some(parent),
                mv: Some(Move {
                    from,
                    to,
                    piece,
                    captured,
                    notation,
                }),
                board,
                turn,
                fen,
                comment: String::new(),
                children: Vec::new(),
                preferred_child: None,
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
            parent_node.preferred_child = Some(id);
        }
        id
    }

    /// Append a move at the given node. If a child with the identical
    /// notation already exists it is reused (marked preferred) instead of
    /// duplicated — transposing input never grows spurious branches.
    pub fn append_move(
        &self,
        at: NodeId,
        from: Square,
        to: Square,
    ) -> Result<(MoveTree, NodeId), EngineError> {
        let node = self.node(at).ok_or(EngineError::NodeNotFound(at))?;
        let piece = node
            .board
            .get(from)
            .ok_or(EngineError::InvalidOperation("no piece on the origin square"))?;
        let notation = localized_notation(from, to, piece);

        let mut tree = self.clone();
        let existing = node
            .children
            .iter()
            .copied()
            .find(|child| tree.nodes[child].notation() == Some(notation.as_str()));

        let id = match existing {
            Some(child) => {
                if let Some(n) = tree.nodes.get_mut(&at) {
                    n.preferred_child = Some(child);
                }
                child
            }
            None => tree.add_child(at, from, to, Some(notation)),
        };
        Ok((tree, id))
    }

    /// Remove the subtree rooted at `id`. The parent's preferred pointer,
    /// if it aimed at the removed child, moves to the sibling now holding
    /// the same ordinal slot (clamped), or clears. Returns the node to
    /// select afterwards.
    pub fn delete_node(&self, id: NodeId) -> Result<(MoveTree, NodeId), EngineError> {
        if id == self.root {
            return Err(EngineError::InvalidOperation(
                "the starting position cannot be deleted",
            ));
        }
        let node = self.node(id).ok_or(EngineError::NodeNotFound(id))?;
        let parent = node.parent.ok_or(EngineError::NodeNotFound(id))?;

        let mut tree = self.clone();
        for gone in tree.subtree_ids(id) {
            tree.nodes.remove(&gone);
        }

        let mut next = parent;
        if let Some(parent_node) = tree.nodes.get_mut(&parent) {
            let index = parent_node.children.iter().position(|&c| c == id);
            if let Some(index) = index {
                parent_node.children.remove(index);
            }
            if parent_node.preferred_child == Some(id) {
                parent_node.preferred_child = match index {
                    Some(index) if !parent_node.children.is_empty() => {
                        let slot = index.min(parent_node.children.len() - 1);
                        Some(parent_node.children[slot])
                    }
                    _ => None,
                };
            }
            if let Some(preferred) = parent_node.preferred_child {
                next = preferred;
            }
        }
        Ok((tree, next))
    }

    /// Swap a node with its immediate sibling; no-op at either end.
    pub fn reorder_sibling(
        &self,
        id: NodeId,
        direction: Direction,
    ) -> Result<MoveTree, EngineError> {
        let node = self.node(id).ok_or(EngineError::NodeNotFound(id))?;
        let Some(parent) = node.parent else {
            return Ok(self.clone());
        };

        let mut tree = self.clone();
        if let Some(parent_node) = tree.nodes.get_mut(&parent) {
            if let Some(index) = parent_node.children.iter().position(|&c| c == id) {
                match direction {
                    Direction::Up if index > 0 => {
                        parent_node.children.swap(index, index - 1);
                    }
                    Direction::Down if index + 1 < parent_node.children.len() => {
                        parent_node.children.swap(index, index + 1);
                    }
                    _ => {}
                }
            }
        }
        Ok(tree)
    }

    pub fn set_comment(&self, id: NodeId, text: &str) -> Result<MoveTree, EngineError> {
        if !self.contains(id) {
            return Err(EngineError::NodeNotFound(id));
        }
        let mut tree = self.clone();
        if let Some(node) = tree.nodes.get_mut(&id) {
            node.comment = text.to_string();
        }
        Ok(tree)
    }

    /// Apply many comment edits at once; unknown ids are skipped. Returns
    /// the new tree and how many nodes were actually updated.
    pub fn batch_set_comments(&self, updates: &[(NodeId, String)]) -> (MoveTree, usize) {
        let mut tree = self.clone();
        let mut updated = 0;
        for (id, text) in updates {
            if let Some(node) = tree.nodes.get_mut(id) {
                node.comment = text.clone();
                updated += 1;
            }
        }
        (tree, updated)
    }

    /// Ids of the subtree rooted at `id`, depth-first, `id` included.
    pub(crate) fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// Serialize the whole tree (persistence format for saved games).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<MoveTree> {
        serde_json::from_str(json)
    }
}
