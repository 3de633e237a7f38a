//! Import graph construction, Kahn ordering, and cycle search.

use std::collections::{BTreeMap, BTreeSet};

use crate::diag::{Diagnostic, Diagnostics};
use crate::model::ModuleRecord;

/// Directed import graph over one batch of modules.
///
/// Nodes are indices into the input slice (input order is significant: it
/// breaks ordering ties and names the node). An edge i → j means module i
/// imports module j, restricted to modules present in the batch.
pub(crate) struct ImportGraph {
    names: Vec<String>,
    deps: Vec<BTreeSet<usize>>,
    dependents: Vec<Vec<usize>>,
}

/// Result of running Kahn's algorithm.
pub(crate) struct KahnOutcome {
    /// Indices in safe processing order (dependencies first).
    pub order: Vec<usize>,
    /// Topological generations: `levels[0]` has no in-batch dependencies,
    /// `levels[n]` depends only on earlier levels. Input order within a level.
    pub levels: Vec<Vec<usize>>,
    /// Indices left with unresolved dependencies (on or behind a cycle),
    /// in input order.
    pub remaining: Vec<usize>,
}

impl ImportGraph {
    /// Build the graph, recording a `MissingDependency` advisory for every
    /// distinct import that is absent from the batch.
    pub fn build(modules: &[ModuleRecord], diagnostics: &mut Diagnostics) -> Self {
        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, module) in modules.iter().enumerate() {
            // First record wins on a duplicated module name, matching the
            // registry's duplicate policy.
            index.entry(module.name.as_str()).or_insert(i);
        }

        let mut names = Vec::with_capacity(modules.len());
        let mut deps = vec![BTreeSet::new(); modules.len()];
        let mut dependents = vec![Vec::new(); modules.len()];

        for (i, module) in modules.iter().enumerate() {
            names.push(module.name.clone());
            let mut reported: BTreeSet<&str> = BTreeSet::new();
            for import in &module.imports {
                match index.get(import.as_str()) {
                    // A self-import carries no ordering constraint.
                    Some(&target) if target != i => {
                        if deps[i].insert(target) {
                            dependents[target].push(i);
                        }
                    }
                    Some(_) => {}
                    None => {
                        if reported.insert(import.as_str()) {
                            diagnostics.push(Diagnostic::MissingDependency {
                                module: module.name.clone(),
                                import: import.clone(),
                            });
                        }
                    }
                }
            }
        }

        Self {
            names,
            deps,
            dependents,
        }
    }

    /// Module name for a node index.
    pub fn name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Kahn's algorithm: repeatedly emit nodes with no unresolved
    /// dependency, decrementing their dependents' pending counts.
    /// Ties among ready nodes break by input order.
    pub fn kahn(&self) -> KahnOutcome {
        let count = self.names.len();
        let mut pending: Vec<usize> = self.deps.iter().map(BTreeSet::len).collect();
        let mut level: Vec<Option<usize>> = vec![None; count];

        // BTreeSet pops the smallest index first, which is the input-order
        // tie break.
        let mut ready: BTreeSet<usize> = (0..count).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(node) = ready.pop_first() {
            let depth = self.deps[node]
                .iter()
                .filter_map(|&dep| level[dep])
                .max()
                .map_or(0, |d| d + 1);
            level[node] = Some(depth);
            order.push(node);

            for &dependent in &self.dependents[node] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        let remaining: Vec<usize> = (0..count).filter(|&i| level[i].is_none()).collect();

        let mut levels: Vec<Vec<usize>> = Vec::new();
        for idx in 0..count {
            if let Some(depth) = level[idx] {
                if levels.len() <= depth {
                    levels.resize_with(depth + 1, Vec::new);
                }
                levels[depth].push(idx);
            }
        }

        KahnOutcome {
            order,
            levels,
            remaining,
        }
    }

    /// Locate one concrete cycle via iterative three-colour depth-first
    /// search over the dependency edges. Returns the cycle as a closed walk:
    /// each node imports the next, and the last imports the first.
    ///
    /// Only meaningful when `kahn` left nodes remaining; returns `None` on
    /// an acyclic graph.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Colour {
            White,
            Grey,
            Black,
        }

        let count = self.names.len();
        let mut colour = vec![Colour::White; count];

        for start in 0..count {
            if colour[start] != Colour::White {
                continue;
            }

            let mut path: Vec<usize> = vec![start];
            let mut frames: Vec<(usize, Vec<usize>, usize)> =
                vec![(start, self.deps[start].iter().copied().collect(), 0)];
            colour[start] = Colour::Grey;

            while let Some((node, children, cursor)) = frames.last_mut() {
                if *cursor < children.len() {
                    let next = children[*cursor];
                    *cursor += 1;
                    match colour[next] {
                        Colour::White => {
                            colour[next] = Colour::Grey;
                            path.push(next);
                            let children = self.deps[next].iter().copied().collect();
                            frames.push((next, children, 0));
                        }
                        Colour::Grey => {
                            // Back edge: the grey node is already on the
                            // current path, closing a cycle.
                            let pos = path
                                .iter()
                                .position(|&n| n == next)
                                .expect("grey node is on the active path");
                            return Some(path[pos..].to_vec());
                        }
                        Colour::Black => {}
                    }
                } else {
                    colour[*node] = Colour::Black;
                    frames.pop();
                    path.pop();
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, imports: &[&str]) -> ModuleRecord {
        ModuleRecord::new(name, format!("{name}.mib"))
            .with_imports(imports.iter().copied())
    }

    #[test]
    fn test_build_restricts_to_batch() {
        let modules = vec![
            module("A", &["B", "SNMPv2-SMI"]),
            module("B", &[]),
        ];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);

        assert_eq!(graph.deps[0], BTreeSet::from([1]));
        assert!(graph.deps[1].is_empty());
        // The out-of-batch import is advisory only.
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_duplicate_imports_collapse() {
        let modules = vec![module("A", &["B", "B", "B"]), module("B", &[])];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);

        assert_eq!(graph.deps[0].len(), 1);
        assert_eq!(graph.dependents[1], vec![0]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_self_import_ignored() {
        let modules = vec![module("A", &["A"])];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);

        assert!(graph.deps[0].is_empty());
        let outcome = graph.kahn();
        assert_eq!(outcome.order, vec![0]);
        assert!(outcome.remaining.is_empty());
    }

    #[test]
    fn test_kahn_orders_dependencies_first() {
        let modules = vec![module("A", &["B"]), module("B", &["C"]), module("C", &[])];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);
        let outcome = graph.kahn();

        assert_eq!(outcome.order, vec![2, 1, 0]);
        assert_eq!(outcome.levels, vec![vec![2], vec![1], vec![0]]);
        assert!(outcome.remaining.is_empty());
    }

    #[test]
    fn test_kahn_ties_break_by_input_order() {
        let modules = vec![
            module("Z", &[]),
            module("M", &[]),
            module("A", &[]),
        ];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);
        let outcome = graph.kahn();

        // All ready at once: input order, not name order.
        assert_eq!(outcome.order, vec![0, 1, 2]);
        assert_eq!(outcome.levels, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_kahn_leaves_cycle_remaining() {
        let modules = vec![
            module("A", &["B"]),
            module("B", &["A"]),
            module("C", &[]),
        ];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);
        let outcome = graph.kahn();

        assert_eq!(outcome.order, vec![2]);
        assert_eq!(outcome.remaining, vec![0, 1]);
    }

    #[test]
    fn test_find_cycle_returns_closed_walk() {
        let modules = vec![
            module("M1", &["M2"]),
            module("M2", &["M3"]),
            module("M3", &["M1"]),
        ];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);

        let cycle = graph.find_cycle().unwrap();
        assert_eq!(cycle.len(), 3);
        // Each node imports its successor, wrapping at the end.
        for (pos, &node) in cycle.iter().enumerate() {
            let next = cycle[(pos + 1) % cycle.len()];
            assert!(graph.deps[node].contains(&next));
        }
    }

    #[test]
    fn test_find_cycle_none_on_acyclic() {
        let modules = vec![module("A", &["B"]), module("B", &[])];
        let mut diags = Diagnostics::new();
        let graph = ImportGraph::build(&modules, &mut diags);
        assert!(graph.find_cycle().is_none());
    }
}
