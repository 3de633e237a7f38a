//! Whole-batch pipeline.
//!
//! Wires the three stages together for the common case:
//!
//! ```text
//! &[ModuleRecord] → resolve → merge (per module, in order) → extract
//! ```
//!
//! The registry is owned by the returned [`BatchOutput`]; dropping an
//! abandoned batch discards all partial state, so nothing half-built can
//! ever be queried. All advisories from every stage fold into one
//! [`Diagnostics`] collection in pipeline order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::diag::{Diagnostics, ResolveError};
use crate::extract::extract;
use crate::model::{LeafNode, ModuleRecord};
use crate::registry::Registry;
use crate::resolver::{resolve, Resolution, ResolveMode};

#[cfg(feature = "parallel")]
use crate::model::ObjectRecord;

/// Pipeline configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Cycle handling policy for the resolution stage.
    pub mode: ResolveMode,
}

impl BatchOptions {
    /// Fail the batch on a cyclic import graph.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: ResolveMode::Strict,
        }
    }

    /// Process cyclic batches best-effort.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            mode: ResolveMode::Lenient,
        }
    }
}

/// Everything a finished batch produces.
#[derive(Clone, Debug)]
pub struct BatchOutput {
    /// Module names in the order they were merged.
    pub order: Vec<String>,
    /// The assembled tree, ready for querying and traversal.
    pub registry: Registry,
    /// The flattened leaf catalogue.
    pub leaves: Vec<LeafNode>,
    /// Advisories from every stage, in pipeline order.
    pub diagnostics: Diagnostics,
}

/// Run the full pipeline over one batch of compiled modules.
///
/// # Errors
///
/// [`ResolveError::CircularDependency`] when the import graph is cyclic
/// and `options.mode` is strict.
pub fn run_batch(
    modules: &[ModuleRecord],
    options: &BatchOptions,
) -> Result<BatchOutput, ResolveError> {
    let Resolution {
        order,
        levels: _,
        mut diagnostics,
    } = resolve(modules, options.mode)?;

    let by_name = index_by_name(modules);
    let mut registry = Registry::new();
    for name in &order {
        if let Some(module) = by_name.get(name.as_str()) {
            diagnostics.absorb(registry.merge(&module.objects));
        }
    }
    diagnostics.absorb(registry.finish());

    let (leaves, extract_diags) = extract(&registry);
    diagnostics.absorb(extract_diags);

    debug!(
        modules = order.len(),
        nodes = registry.node_count(),
        leaves = leaves.len(),
        advisories = diagnostics.len(),
        "batch complete"
    );

    Ok(BatchOutput {
        order,
        registry,
        leaves,
        diagnostics,
    })
}

/// Run the pipeline with a caller-supplied per-module compile step,
/// fanning the compile work out across worker threads.
///
/// Modules within one topological level share no dependency edge, so their
/// records are prepared in parallel; merges into the shared registry stay
/// serialized in resolver order, preserving the first-writer-wins duplicate
/// policy and deterministic child attachment.
///
/// # Errors
///
/// [`ResolveError::CircularDependency`] when the import graph is cyclic
/// and `options.mode` is strict.
#[cfg(feature = "parallel")]
pub fn run_batch_with<F>(
    modules: &[ModuleRecord],
    options: &BatchOptions,
    compile: F,
) -> Result<BatchOutput, ResolveError>
where
    F: Fn(&ModuleRecord) -> Vec<ObjectRecord> + Sync,
{
    use rayon::prelude::*;

    let Resolution {
        order,
        levels,
        mut diagnostics,
    } = resolve(modules, options.mode)?;

    let by_name = index_by_name(modules);
    let mut prepared: BTreeMap<&str, Vec<ObjectRecord>> = BTreeMap::new();
    for level in &levels {
        let batches: Vec<(&str, Vec<ObjectRecord>)> = level
            .par_iter()
            .filter_map(|name| {
                by_name
                    .get(name.as_str())
                    .map(|module| (module.name.as_str(), compile(module)))
            })
            .collect();
        prepared.extend(batches);
    }

    let mut registry = Registry::new();
    for name in &order {
        if let Some(objects) = prepared.get(name.as_str()) {
            diagnostics.absorb(registry.merge(objects));
        }
    }
    diagnostics.absorb(registry.finish());

    let (leaves, extract_diags) = extract(&registry);
    diagnostics.absorb(extract_diags);

    Ok(BatchOutput {
        order,
        registry,
        leaves,
        diagnostics,
    })
}

/// Index a batch by module name; the first record wins a duplicated name.
fn index_by_name(modules: &[ModuleRecord]) -> BTreeMap<&str, &ModuleRecord> {
    let mut by_name = BTreeMap::new();
    for module in modules {
        by_name.entry(module.name.as_str()).or_insert(module);
    }
    by_name
}
