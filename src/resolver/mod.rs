//! Dependency resolution.
//!
//! Computes a safe processing order over a batch of modules so that every
//! module merges after the modules it imports:
//!
//! ```text
//! &[ModuleRecord] → resolve() → Resolution { order, levels, diagnostics }
//! ```
//!
//! Imports naming modules outside the batch carry no ordering constraint
//! and are reported as `MissingDependency` advisories. Cycles fail the run
//! in [`ResolveMode::Strict`]; in [`ResolveMode::Lenient`] the cyclic
//! modules are appended in input order for best-effort downstream use.
//!
//! Resolution is a pure function of its inputs: no state survives the call.

mod graph;

use tracing::debug;

use crate::diag::{Diagnostic, Diagnostics, ResolveError};
use crate::model::ModuleRecord;
use graph::ImportGraph;

/// Cycle handling policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveMode {
    /// A cyclic import graph aborts resolution.
    Strict,
    /// Cyclic modules are appended in input order with an advisory.
    #[default]
    Lenient,
}

/// Output of a resolution run.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Module names in safe processing order, each exactly once.
    pub order: Vec<String>,
    /// The order grouped into topological generations: modules within one
    /// level have no dependency edge between them and may be prepared in
    /// parallel. Cyclic modules (lenient mode) form a trailing level.
    pub levels: Vec<Vec<String>>,
    /// Advisories gathered while resolving.
    pub diagnostics: Diagnostics,
}

/// Compute a dependency-safe processing order for `modules`.
///
/// For every import edge "A imports B" with both modules in the batch, B
/// precedes A in the returned order. Ties break by input order.
///
/// # Errors
///
/// [`ResolveError::CircularDependency`] when the graph is cyclic and `mode`
/// is [`ResolveMode::Strict`]. The error carries one concrete cycle path.
pub fn resolve(modules: &[ModuleRecord], mode: ResolveMode) -> Result<Resolution, ResolveError> {
    let mut diagnostics = Diagnostics::new();
    let graph = ImportGraph::build(modules, &mut diagnostics);
    let outcome = graph.kahn();

    debug!(
        modules = modules.len(),
        ordered = outcome.order.len(),
        cyclic = outcome.remaining.len(),
        "dependency resolution"
    );

    let mut order: Vec<String> = outcome
        .order
        .iter()
        .map(|&idx| graph.name(idx).to_owned())
        .collect();
    let mut levels: Vec<Vec<String>> = outcome
        .levels
        .iter()
        .map(|level| level.iter().map(|&idx| graph.name(idx).to_owned()).collect())
        .collect();

    if !outcome.remaining.is_empty() {
        let path: Vec<String> = graph
            .find_cycle()
            .unwrap_or_default()
            .into_iter()
            .map(|idx| graph.name(idx).to_owned())
            .collect();

        if mode == ResolveMode::Strict {
            return Err(ResolveError::CircularDependency { path });
        }

        let stragglers: Vec<String> = outcome
            .remaining
            .iter()
            .map(|&idx| graph.name(idx).to_owned())
            .collect();
        diagnostics.push(Diagnostic::CircularDependency { path });
        order.extend(stragglers.iter().cloned());
        levels.push(stragglers);
    }

    Ok(Resolution {
        order,
        levels,
        diagnostics,
    })
}
