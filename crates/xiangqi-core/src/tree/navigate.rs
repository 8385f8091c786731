//! Read-only traversal over the move tree: paths, the active line,
//! sibling groups and decision-point stepping.

use super::{Direction, MoveTree, NodeId};

/// Guard against a corrupted preferred-pointer cycle; the invariants
/// should make this unreachable, but traversal must stay bounded.
const MAX_ACTIVE_DEPTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

impl MoveTree {
    /// Ancestors from the root down to `id`, inclusive. `None` when the
    /// id is not in the tree.
    pub fn path_to_root(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let mut path = Vec::new();
        let mut current = self.node(id)?;
        loop {
            path.push(current.id);
            match current.parent {
                Some(parent) => current = self.node(parent)?,
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }

    /// The line the UI shows: history up to `current`, extended forward
    /// along preferred children until a leaf. A stale id falls back to
    /// the root.
    pub fn active_path(&self, current: NodeId) -> Vec<NodeId> {
        let current = self.node_or_root(current).id;
        let mut path = self
            .path_to_root(current)
            .unwrap_or_else(|| vec![self.root]);

        let mut at = self.node_or_root(current);
        let mut depth = 0;
        while !at.children.is_empty() && depth < MAX_ACTIVE_DEPTH {
            let next = at
                .preferred_child
                .filter(|id| at.children.contains(id))
                .unwrap_or(at.children[0]);
            let Some(node) = self.node(next) else { break };
            path.push(next);
            at = node;
            depth += 1;
        }
        path
    }

    /// The variation slate at `id`'s ply: its parent's children (the
    /// root's own children when `id` is the root).
    pub fn sibling_group(&self, id: NodeId) -> Vec<NodeId> {
        let node = self.node_or_root(id);
        match node.parent {
            Some(parent) => self.children(parent).to_vec(),
            None => node.children.clone(),
        }
    }

    /// Walk toward the nearest decision point — a node whose parent has
    /// more than one child — up (`Prev`) or down (`Next`) the tree.
    /// `None` when no branch point exists in that direction.
    pub fn step_variation(&self, id: NodeId, step: Step) -> Option<NodeId> {
        let mut current = self.node(id)?;
        match step {
            Step::Prev => {
                current = self.node(current.parent?)?;
                while let Some(parent_id) = current.parent {
                    let parent = self.node(parent_id)?;
                    if parent.children.len() > 1 {
                        return Some(current.id);
                    }
                    current = parent;
                }
                None
            }
            Step::Next => {
                while !current.children.is_empty() {
                    let next = current
                        .preferred_child
                        .filter(|c| current.children.contains(c))
                        .unwrap_or(current.children[0]);
                    if current.children.len() > 1 {
                        return Some(next);
                    }
                    current = self.node(next)?;
                }
                None
            }
        }
    }

    /// Move to the previous/next entry of the same sibling group. The one
    /// navigator operation that also writes: viewing a sibling redefines
    /// the main line, so the parent's preferred pointer follows.
    pub fn cycle_sibling(&self, id: NodeId, direction: Direction) -> Option<(MoveTree, NodeId)> {
        let node = self.node(id)?;
        let parent_id = node.parent?;
        let siblings = self.children(parent_id);
        if siblings.len() <= 1 {
            return None;
        }
        let index = siblings.iter().position(|&c| c == id)?;
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => {
                if index + 1 < siblings.len() {
                    index + 1
                } else {
                    return None;
                }
            }
        };
        let sibling = siblings[target];

        let mut tree = self.clone();
        if let Some(parent) = tree.nodes.get_mut(&parent_id) {
            parent.preferred_child = Some(sibling);
        }
        Some((tree, sibling))
    }

    /// The full preferred line from the root to its leaf.
    pub fn main_line(&self) -> Vec<NodeId> {
        self.active_path(self.root)
    }

    /// Node at the given step (0 = root) of the main line.
    pub fn main_line_at(&self, step: usize) -> Option<NodeId> {
        self.main_line().get(step).copied()
    }

    /// Round number of the position at `id` (two plies per round).
    pub fn round_number(&self, id: NodeId) -> usize {
        match self.path_to_root(id) {
            Some(path) => (path.len() - 1) / 2 + 1,
            None => 1,
        }
    }
}
