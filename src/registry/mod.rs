//! Object registry and tree builder.
//!
//! The registry is the single owner of all tree nodes. Storage is an arena
//! (`Vec<TreeNode>`) with stable [`NodeId`] indices; name and OID lookup
//! maps sit beside it. Parent/child links are ids into the arena, so the
//! structure cannot form ownership cycles, and a link that would close a
//! reference cycle is refused at attachment time.
//!
//! Lifecycle is caller-controlled: create, [`merge`](Registry::merge) once
//! per module in resolver order, query, discard. Nothing here is
//! process-global.

mod traverse;

pub use traverse::{BfsIter, DfsIter};

use std::collections::BTreeMap;

use tracing::debug;

use crate::diag::{Diagnostic, Diagnostics};
use crate::model::{NodeId, ObjectRecord, Oid, TreeNode};

/// Aggregate shape counters for a built tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeStatistics {
    /// Nodes in the arena, reachable or not.
    pub total_nodes: usize,
    /// Nodes with no declared parent.
    pub roots: usize,
    /// Nodes whose declared parent never materialized.
    pub orphans: usize,
    /// Nodes with at least one child.
    pub branches: usize,
    /// Nodes with no children.
    pub leaves: usize,
    /// Deepest resolved ancestor chain (root = 0).
    pub max_depth: usize,
}

/// Name- and OID-indexed arena of [`TreeNode`]s.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    nodes: Vec<TreeNode>,
    by_name: BTreeMap<String, NodeId>,
    by_oid: BTreeMap<Oid, NodeId>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a single batch of records.
    #[must_use]
    pub fn build(objects: &[ObjectRecord]) -> (Self, Diagnostics) {
        let mut registry = Self::new();
        let mut diagnostics = registry.merge(objects);
        diagnostics.absorb(registry.finish());
        (registry, diagnostics)
    }

    /// Merge one module's records into the registry.
    ///
    /// Records are indexed first (first writer wins on a name collision,
    /// with a `DuplicateNode` advisory for the loser), then a second pass
    /// re-evaluates parent attachment for every node in the arena, so
    /// children merged before their parent are adopted retroactively.
    pub fn merge(&mut self, objects: &[ObjectRecord]) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for record in objects {
            if let Some(&existing) = self.by_name.get(&record.name) {
                let kept = &self.nodes[existing.to_index()].record;
                diagnostics.push(Diagnostic::DuplicateNode {
                    name: record.name.clone(),
                    kept_module: kept.module_name.clone(),
                    rejected_module: record.module_name.clone(),
                });
                continue;
            }

            let id = NodeId::from_index(self.nodes.len())
                .expect("registry node arena exceeded u32 capacity");
            self.by_name.insert(record.name.clone(), id);
            // First registration wins the OID index as well.
            self.by_oid.entry(record.oid.clone()).or_insert(id);
            self.nodes.push(TreeNode::new(record.clone()));
        }

        self.attach_pending();

        debug!(
            merged = objects.len(),
            total = self.nodes.len(),
            duplicates = diagnostics.len(),
            "registry merge"
        );

        diagnostics
    }

    /// Attach every node whose declared parent is now present.
    fn attach_pending(&mut self) {
        for index in 0..self.nodes.len() {
            if self.nodes[index].parent.is_some() {
                continue;
            }
            let Some(parent_name) = self.nodes[index].record.parent_name.clone() else {
                continue;
            };
            if parent_name.is_empty() {
                continue;
            }
            let Some(&parent_id) = self.by_name.get(&parent_name) else {
                continue;
            };

            let id = NodeId::from_index(index).expect("index fits an existing id");
            if parent_id == id || self.is_ancestor(id, parent_id) {
                // Linking would close a reference cycle; the node stays
                // unattached and surfaces as an orphan.
                continue;
            }

            self.nodes[index].parent = Some(parent_id);
            self.nodes[parent_id.to_index()].add_child(id);
        }
    }

    /// True when `candidate` appears on `node`'s resolved ancestor chain.
    fn is_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.to_index()].parent;
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes[id.to_index()].parent;
        }
        false
    }

    /// Report nodes whose declared parent never materialized. Call after
    /// the last merge of a batch.
    #[must_use]
    pub fn finish(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for node in self.orphans() {
            diagnostics.push(Diagnostic::OrphanedNode {
                name: node.record.name.clone(),
                parent_name: node.record.parent_name.clone().unwrap_or_default(),
            });
        }
        diagnostics
    }

    // === Lookup ===

    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by arena id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.to_index())
    }

    /// Get a node by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&TreeNode> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Get a node's arena id by name.
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Get a node by OID.
    #[must_use]
    pub fn get_by_oid(&self, oid: &Oid) -> Option<&TreeNode> {
        self.by_oid.get(oid).and_then(|&id| self.get(id))
    }

    /// Get a node by dotted OID string.
    #[must_use]
    pub fn get_by_oid_str(&self, oid: &str) -> Option<&TreeNode> {
        Oid::parse(oid).and_then(|oid| self.get_by_oid(&oid))
    }

    // === Structure ===

    /// Root nodes (no declared parent), in arena order.
    pub fn roots(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none() && n.record.is_root_candidate())
    }

    pub(crate) fn root_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent.is_none() && n.record.is_root_candidate())
            .filter_map(|(i, _)| NodeId::from_index(i))
            .collect()
    }

    /// Nodes whose declared parent never materialized, in arena order.
    /// They are excluded from traversal but remain retrievable by lookup.
    pub fn orphans(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none() && !n.record.is_root_candidate())
    }

    /// Direct children of a named node, in attachment order.
    #[must_use]
    pub fn children(&self, name: &str) -> Vec<&TreeNode> {
        self.get_by_name(name)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&id| self.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full subtree below a named node in pre-order, excluding the node
    /// itself.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&TreeNode> {
        let Some(node) = self.get_by_name(name) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(child) = self.get(id) else { continue };
            result.push(child);
            stack.extend(child.children.iter().rev());
        }
        result
    }

    /// Number of resolved ancestors of a named node (root = 0).
    #[must_use]
    pub fn depth(&self, name: &str) -> Option<usize> {
        let node = self.get_by_name(name)?;
        let mut depth = 0;
        let mut current = node.parent;
        while let Some(id) = current {
            depth += 1;
            current = self.get(id)?.parent;
        }
        Some(depth)
    }

    /// Ancestor names from the top of the chain down to the named node,
    /// inclusive. Empty when the name is unknown.
    #[must_use]
    pub fn path(&self, name: &str) -> Vec<String> {
        let Some(node) = self.get_by_name(name) else {
            return Vec::new();
        };
        let mut path = vec![node.record.name.clone()];
        let mut current = node.parent;
        while let Some(id) = current {
            let Some(ancestor) = self.get(id) else { break };
            path.push(ancestor.record.name.clone());
            current = ancestor.parent;
        }
        path.reverse();
        path
    }

    // === Analysis ===

    /// Reachable nodes grouped by depth: `levels()[0]` are the roots.
    #[must_use]
    pub fn levels(&self) -> Vec<Vec<&TreeNode>> {
        let mut levels: Vec<Vec<&TreeNode>> = Vec::new();
        let mut frontier = self.root_ids();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            let mut layer = Vec::new();
            for id in frontier {
                let Some(node) = self.get(id) else { continue };
                layer.push(node);
                next.extend(node.children.iter().copied());
            }
            levels.push(layer);
            frontier = next;
        }
        levels
    }

    /// The deepest node on every given node's root path. `None` when any
    /// name is unknown or the nodes share no ancestor.
    #[must_use]
    pub fn common_ancestor(&self, names: &[&str]) -> Option<&TreeNode> {
        let first = names.first()?;
        let mut prefix = self.path(first);
        if prefix.is_empty() {
            return None;
        }
        for name in &names[1..] {
            let path = self.path(name);
            if path.is_empty() {
                return None;
            }
            let shared = prefix
                .iter()
                .zip(path.iter())
                .take_while(|(a, b)| a == b)
                .count();
            prefix.truncate(shared);
            if prefix.is_empty() {
                return None;
            }
        }
        self.get_by_name(prefix.last()?)
    }

    /// Number of edges between two nodes through their common ancestor.
    #[must_use]
    pub fn distance(&self, first: &str, second: &str) -> Option<usize> {
        let ancestor = self.common_ancestor(&[first, second])?;
        let shared = self.path(ancestor.name()).len();
        let a = self.path(first).len();
        let b = self.path(second).len();
        Some((a - shared) + (b - shared))
    }

    /// Shape counters over the whole arena.
    #[must_use]
    pub fn statistics(&self) -> TreeStatistics {
        let mut stats = TreeStatistics {
            total_nodes: self.nodes.len(),
            ..TreeStatistics::default()
        };
        for node in &self.nodes {
            if node.parent.is_none() && node.record.is_root_candidate() {
                stats.roots += 1;
            }
            if node.parent.is_none() && !node.record.is_root_candidate() {
                stats.orphans += 1;
            }
            if node.is_leaf() {
                stats.leaves += 1;
            } else {
                stats.branches += 1;
            }
        }
        stats.max_depth = self
            .levels()
            .len()
            .saturating_sub(1);
        stats
    }

    /// Check structural consistency: parent/child links must agree, and a
    /// resolved parent's OID must be the one-segment prefix of its child's.
    /// Returns one message per violation; empty means consistent.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId::from_index(index).expect("index fits an existing id");

            if let Some(parent_id) = node.parent {
                let parent = &self.nodes[parent_id.to_index()];
                if !parent.children.contains(&id) {
                    issues.push(format!(
                        "node '{}' has parent '{}' but is missing from its children",
                        node.name(),
                        parent.name()
                    ));
                }
                if !parent.oid().is_parent_of(node.oid()) {
                    issues.push(format!(
                        "node '{}' ({}) is not one segment below parent '{}' ({})",
                        node.name(),
                        node.oid(),
                        parent.name(),
                        parent.oid()
                    ));
                }
            }

            for &child_id in &node.children {
                let child = &self.nodes[child_id.to_index()];
                if child.parent != Some(id) {
                    issues.push(format!(
                        "node '{}' lists child '{}' which points to a different parent",
                        node.name(),
                        child.name()
                    ));
                }
            }
        }
        issues
    }

    /// Case-insensitive substring search over names, and over descriptions
    /// when `search_descriptions` is set. Arena order.
    #[must_use]
    pub fn find_by_name_pattern(&self, pattern: &str, search_descriptions: bool) -> Vec<&TreeNode> {
        let needle = pattern.to_lowercase();
        self.nodes
            .iter()
            .filter(|node| {
                node.record.name.to_lowercase().contains(&needle)
                    || (search_descriptions
                        && node
                            .record
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle)))
            })
            .collect()
    }
}
