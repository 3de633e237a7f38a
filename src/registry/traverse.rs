//! Tree traversal over the registry.
//!
//! Both orders are iterative (explicit stack/queue) so arbitrarily deep or
//! malformed trees cannot exhaust the call stack. Siblings are visited in
//! attachment order and each reachable node is produced exactly once;
//! orphaned subtrees are not reachable from the roots and never appear.

use std::collections::{BTreeSet, VecDeque};

use crate::model::{NodeId, TreeNode};

use super::Registry;

/// Depth-first pre-order iterator.
pub struct DfsIter<'a> {
    registry: &'a Registry,
    stack: Vec<NodeId>,
    visited: BTreeSet<NodeId>,
}

impl<'a> Iterator for DfsIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id) {
                continue;
            }
            let node = self.registry.get(id)?;
            // Reversed push keeps sibling order on a LIFO stack.
            self.stack.extend(node.children.iter().rev());
            return Some(node);
        }
        None
    }
}

/// Breadth-first iterator.
pub struct BfsIter<'a> {
    registry: &'a Registry,
    queue: VecDeque<NodeId>,
    visited: BTreeSet<NodeId>,
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.queue.pop_front() {
            if !self.visited.insert(id) {
                continue;
            }
            let node = self.registry.get(id)?;
            self.queue.extend(node.children.iter());
            return Some(node);
        }
        None
    }
}

impl Registry {
    /// Depth-first pre-order over all roots.
    #[must_use]
    pub fn dfs(&self) -> DfsIter<'_> {
        let mut stack = self.root_ids();
        stack.reverse();
        DfsIter {
            registry: self,
            stack,
            visited: BTreeSet::new(),
        }
    }

    /// Depth-first pre-order over the subtree of a named node, inclusive.
    /// Empty iteration when the name is unknown.
    #[must_use]
    pub fn dfs_from(&self, name: &str) -> DfsIter<'_> {
        DfsIter {
            registry: self,
            stack: self.id_by_name(name).into_iter().collect(),
            visited: BTreeSet::new(),
        }
    }

    /// Breadth-first over all roots.
    #[must_use]
    pub fn bfs(&self) -> BfsIter<'_> {
        BfsIter {
            registry: self,
            queue: self.root_ids().into(),
            visited: BTreeSet::new(),
        }
    }

    /// Breadth-first over the subtree of a named node, inclusive.
    #[must_use]
    pub fn bfs_from(&self, name: &str) -> BfsIter<'_> {
        BfsIter {
            registry: self,
            queue: self.id_by_name(name).into_iter().collect(),
            visited: BTreeSet::new(),
        }
    }
}
