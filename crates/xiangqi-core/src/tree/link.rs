//! Position linker: transposing lines — different move orders reaching
//! the identical position — are made to share every known continuation.

use tracing::{debug, info};

use super::{MoveTree, NodeId};
use crate::error::EngineError;
use crate::fen::base_fen;

/// Outcome summary handed back for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkReport {
    /// How many nodes in the tree hold the linked position.
    pub positions: usize,
    /// Branches copied across during this run; zero means the matching
    /// positions were already fully synchronized.
    pub copied_branches: usize,
}

impl MoveTree {
    /// Find every node whose position (board + turn, counters ignored)
    /// equals that of `at`, and union their variation sets: for each
    /// matching pair, continuations are merged recursively by notation,
    /// and branches known only on one side are deep-cloned onto the
    /// other with fresh ids.
    pub fn link_transpositions(
        &self,
        at: NodeId,
    ) -> Result<(MoveTree, LinkReport), EngineError> {
        let node = self.node(at).ok_or(EngineError::NodeNotFound(at))?;
        let key = base_fen(&node.fen);

        let mut matches: Vec<NodeId> = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(n) = self.node(id) else { continue };
            if base_fen(&n.fen) == key {
                matches.push(id);
            }
            // Push in reverse so matches come out in document order.
            stack.extend(n.children.iter().rev().copied());
        }

        if matches.len() < 2 {
            debug!(positions = matches.len(), "position is unique, nothing to link");
            return Ok((
                self.clone(),
                LinkReport {
                    positions: matches.len(),
                    copied_branches: 0,
                },
            ));
        }

        let mut tree = self.clone();
        let mut copied = 0;

        // Accumulate the union of every matching node's variations onto
        // the first match, then re-apply that union to all the others.
        let pool = matches[0];
        for &other in &matches[1..] {
            copied += tree.merge_children(pool, other);
        }
        for &other in &matches[1..] {
            copied += tree.merge_children(other, pool);
        }

        info!(
            positions = matches.len(),
            copied_branches = copied,
            "linked transposed positions"
        );
        Ok((
            tree,
            LinkReport {
                positions: matches.len(),
                copied_branches: copied,
            },
        ))
    }

    /// Merge `source`'s children into `target`'s, recursively. Children
    /// whose notations match are treated as the same variation and their
    /// suffixes merged in turn; the rest are deep-cloned across. Returns
    /// the number of branches cloned at any depth.
    fn merge_children(&mut self, target: NodeId, source: NodeId) -> usize {
        if target == source {
            return 0;
        }
        let source_children = self.children(source).to_vec();
        let mut copied = 0;
        for sc in source_children {
            let Some(notation) = self.node(sc).and_then(|n| n.notation().map(String::from))
            else {
                continue;
            };
            let existing = self
                .children(target)
                .iter()
                .copied()
                .find(|&tc| self.node(tc).and_then(|n| n.notation()) == Some(notation.as_str()));
            match existing {
                Some(tc) => copied += self.merge_children(tc, sc),
                None => {
                    self.clone_branch(sc, target);
                    copied += 1;
                }
            }
        }
        copied
    }

    /// Deep-clone the subtree rooted at `source` under `new_parent`,
    /// minting fresh ids top-to-bottom and re-mapping every internal
    /// preferred pointer old-id -> new-id. Identities are never shared
    /// between the original branch and its copy.
    pub(crate) fn clone_branch(&mut self, source: NodeId, new_parent: NodeId) -> Option<NodeId> {
        use std::collections::HashMap;

        // Snapshot first: the source subtree may overlap the region the
        // merge is currently growing.
        let ids = self.subtree_ids(source);
        let snapshot: Vec<_> = ids
            .iter()
            .filter_map(|id| self.node(*id).cloned())
            .collect();

        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();
        for node in &snapshot {
            let fresh = self.mint_id();
            remap.insert(node.id, fresh);
        }

        for node in snapshot {
            let mut copy = node.clone();
            copy.id = remap[&node.id];
            copy.parent = if node.id == source {
                Some(new_parent)
            } else {
                node.parent.and_then(|p| remap.get(&p).copied())
            };
            copy.children = node
                .children
                .iter()
                .filter_map(|c| remap.get(c).copied())
                .collect();
            copy.preferred_child = node
                .preferred_child
                .and_then(|p| remap.get(&p).copied())
                .or_else(|| copy.children.first().copied());
            if copy.children.is_empty() {
                copy.preferred_child = None;
            }
            self.nodes.insert(copy.id, copy);
        }

        let new_root = remap.get(&source).copied()?;
        if let Some(parent) = self.nodes.get_mut(&new_parent) {
            parent.children.push(new_root);
        }
        Some(new_root)
    }
}
