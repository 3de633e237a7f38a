//! mibatlas: MIB knowledge structure library
//!
//! Turns compiled SNMP MIB modules into a navigable, queryable structure:
//! a dependency-ordered module list, a hierarchical OID tree keyed by name
//! and numeric identifier, and a flattened catalogue of terminal objects
//! annotated with table-row indexing metadata.
//!
//! # Pipeline
//!
//! ```text
//! ModuleRecord* → Resolver → merge order
//!                          → Registry (OID tree + lookup indices)
//!                          → Leaf catalogue (index fields, paths)
//! ```
//!
//! The byte-level SMI grammar is someone else's job: inputs are structured
//! [`ModuleRecord`]/[`ObjectRecord`] values from an external compiler, and
//! outputs are plain data for serializers and query services to consume.
//!
//! # Usage
//!
//! ```
//! use mibatlas::{run_batch, BatchOptions, ModuleRecord, ObjectRecord, Oid, SyntaxKind};
//!
//! let system = ModuleRecord::new("TOY-MIB", "TOY-MIB.mib").with_objects(vec![
//!     ObjectRecord::new(Oid::parse("1.3.6.1").unwrap(), "internet", "TOY-MIB", SyntaxKind::Other),
//!     ObjectRecord::new(Oid::parse("1.3.6.1.1").unwrap(), "uptime", "TOY-MIB", SyntaxKind::Scalar)
//!         .with_parent("internet")
//!         .with_syntax("TimeTicks"),
//! ]);
//!
//! let output = run_batch(&[system], &BatchOptions::strict()).unwrap();
//! assert_eq!(output.leaves[0].name, "uptime");
//! assert!(output.registry.get_by_oid_str("1.3.6.1.1").is_some());
//! ```
//!
//! # Diagnostics
//!
//! Advisory conditions (missing imports, duplicate names, orphaned nodes,
//! unresolvable index fields) never abort an operation; they are collected
//! in [`Diagnostics`] and returned beside the result. The only hard failure
//! is a cyclic import graph under [`ResolveMode::Strict`].

pub mod batch;
pub mod diag;
pub mod extract;
pub mod model;
pub mod registry;
pub mod resolver;

pub use batch::{run_batch, BatchOptions, BatchOutput};
#[cfg(feature = "parallel")]
pub use batch::run_batch_with;
pub use diag::{Diagnostic, DiagnosticKind, Diagnostics, ResolveError};
pub use extract::extract;
pub use model::{
    Access, IndexField, LeafNode, ModuleRecord, NodeId, ObjectRecord, Oid, Status, SyntaxKind,
    TreeNode,
};
pub use registry::{Registry, TreeStatistics};
pub use resolver::{resolve, Resolution, ResolveMode};
